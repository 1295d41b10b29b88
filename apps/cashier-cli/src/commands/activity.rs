//! # Activity Commands
//!
//! Creating and inspecting promotions. Discounts arrive as plain integers and
//! are range-checked here, so a bad percentage is a `VALIDATION_ERROR` rather
//! than a decoding failure.
//!
//! ```text
//! create_token_activity   tier + [start, end) + discount 1-100
//! create_product_activity        [start, end) + discount 0-100
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use cashier_core::{
    DiscountRate, MemberTier, PointDiscount, ProductPurchaseActivity, TokenPurchaseActivity,
};

use super::TierInput;
use crate::error::ApiError;
use crate::state::CashierState;

/// Returned by both create commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedActivityDto {
    pub activity_id: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenActivityDto {
    pub id: u64,
    pub tier: MemberTier,
    pub discount: u8,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<TokenPurchaseActivity> for TokenActivityDto {
    fn from(a: TokenPurchaseActivity) -> Self {
        TokenActivityDto {
            id: a.id,
            tier: a.tier,
            discount: a.discount.percent(),
            start: a.period.start,
            end: a.period.end,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductActivityDto {
    pub id: u64,
    pub discount: u8,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<ProductPurchaseActivity> for ProductActivityDto {
    fn from(a: ProductPurchaseActivity) -> Self {
        ProductActivityDto {
            id: a.id,
            discount: a.discount.percent(),
            start: a.period.start,
            end: a.period.end,
        }
    }
}

pub fn create_token_activity(
    state: &CashierState,
    tier: TierInput,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    discount: u8,
) -> Result<CreatedActivityDto, ApiError> {
    let tier = MemberTier::try_from(tier)?;
    let discount = DiscountRate::new(discount)?;
    let activity_id = state
        .cashier
        .create_token_activity(tier, start, end, discount)?;
    Ok(CreatedActivityDto { activity_id })
}

pub fn create_product_activity(
    state: &CashierState,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    discount: u8,
) -> Result<CreatedActivityDto, ApiError> {
    let discount = PointDiscount::new(discount)?;
    let activity_id = state.cashier.create_product_activity(start, end, discount)?;
    Ok(CreatedActivityDto { activity_id })
}

pub fn get_token_activity(
    state: &CashierState,
    activity_id: u64,
) -> Result<TokenActivityDto, ApiError> {
    Ok(state.cashier.token_activity(activity_id)?.into())
}

pub fn get_product_activity(
    state: &CashierState,
    activity_id: u64,
) -> Result<ProductActivityDto, ApiError> {
    Ok(state.cashier.product_activity(activity_id)?.into())
}

pub fn list_token_activities(state: &CashierState) -> Result<Vec<TokenActivityDto>, ApiError> {
    Ok(state
        .cashier
        .token_activities()?
        .into_iter()
        .map(TokenActivityDto::from)
        .collect())
}

pub fn list_product_activities(
    state: &CashierState,
) -> Result<Vec<ProductActivityDto>, ApiError> {
    Ok(state
        .cashier
        .product_activities()?
        .into_iter()
        .map(ProductActivityDto::from)
        .collect())
}
