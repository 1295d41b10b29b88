//! # Purchase Commands
//!
//! Token sales, product purchases, and the revenue ledger.
//!
//! ## Purchase Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  buy_token / buy_token_with_activity                                   │
//! │     → { charge, balance }      charge is added to the ledger           │
//! │                                                                         │
//! │  buy_product                                                           │
//! │     → { tokens, balance }      tokens = product price                  │
//! │                                                                         │
//! │  quote_product_with_activity                                           │
//! │     → { points, tokens }       nothing is debited                      │
//! │                                                                         │
//! │  buy_product_with_activity                                             │
//! │     → { points, tokens, balance }                                      │
//! │                                                                         │
//! │  total_amount                                                          │
//! │     → { totalAmount }                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use cashier_core::{Balance, ProductSplit};

use crate::error::ApiError;
use crate::state::CashierState;

/// Result of a token sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeDto {
    /// Amount the user paid.
    pub charge: u64,
    pub balance: Balance,
}

/// Result of a product purchase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDto {
    pub points: u64,
    pub tokens: u64,
    pub balance: Balance,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalAmountDto {
    pub total_amount: u64,
}

pub fn buy_token(state: &CashierState, user_id: u64, quantity: u64) -> Result<ChargeDto, ApiError> {
    let charge = state.cashier.buy_token(user_id, quantity)?;
    let balance = state.cashier.balance(user_id)?;
    Ok(ChargeDto { charge, balance })
}

pub fn buy_token_with_activity(
    state: &CashierState,
    user_id: u64,
    quantity: u64,
    at: Option<DateTime<Utc>>,
) -> Result<ChargeDto, ApiError> {
    let charge = match at {
        Some(moment) => state
            .cashier
            .buy_token_with_activity_at(user_id, quantity, moment)?,
        None => state.cashier.buy_token_with_activity(user_id, quantity)?,
    };
    let balance = state.cashier.balance(user_id)?;
    Ok(ChargeDto { charge, balance })
}

pub fn buy_product(
    state: &CashierState,
    user_id: u64,
    product_id: u64,
) -> Result<PurchaseDto, ApiError> {
    let tokens = state.cashier.buy_product(user_id, product_id)?;
    let balance = state.cashier.balance(user_id)?;
    Ok(PurchaseDto {
        points: 0,
        tokens,
        balance,
    })
}

pub fn quote_product_with_activity(
    state: &CashierState,
    user_id: u64,
    product_id: u64,
    activity_id: u64,
) -> Result<ProductSplit, ApiError> {
    Ok(state
        .cashier
        .quote_product_with_activity(user_id, product_id, activity_id)?)
}

pub fn buy_product_with_activity(
    state: &CashierState,
    user_id: u64,
    product_id: u64,
    activity_id: u64,
) -> Result<PurchaseDto, ApiError> {
    let split = state
        .cashier
        .buy_product_with_activity(user_id, product_id, activity_id)?;
    let balance = state.cashier.balance(user_id)?;

    info!(
        user_id = %user_id,
        points = split.points,
        tokens = split.tokens,
        "buy_product_with_activity complete"
    );

    Ok(PurchaseDto {
        points: split.points,
        tokens: split.tokens,
        balance,
    })
}

pub fn total_amount(state: &CashierState) -> TotalAmountDto {
    TotalAmountDto {
        total_amount: state.cashier.total_amount(),
    }
}
