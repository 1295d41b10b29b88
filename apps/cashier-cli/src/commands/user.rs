//! # User Commands
//!
//! Registration, lookups, and manual balance adjustments.

use serde::Serialize;
use tracing::info;

use cashier_core::{Balance, MemberTier, UserSnapshot};

use super::TierInput;
use crate::error::ApiError;
use crate::state::CashierState;

/// Returned by `register_user`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUserDto {
    pub user_id: u64,
}

/// User DTO with balances flattened in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: u64,
    pub name: String,
    pub tier: MemberTier,
    pub tier_level: u8,
    pub default_discount: u8,
    pub tokens: u64,
    pub points: u64,
}

impl From<UserSnapshot> for UserDto {
    fn from(user: UserSnapshot) -> Self {
        UserDto {
            id: user.id,
            name: user.name,
            tier: user.tier,
            tier_level: user.tier.level(),
            default_discount: user.default_discount.percent(),
            tokens: user.balance.tokens,
            points: user.balance.points,
        }
    }
}

pub fn register_user(
    state: &CashierState,
    name: &str,
    tier: TierInput,
) -> Result<RegisteredUserDto, ApiError> {
    let tier = MemberTier::try_from(tier)?;
    let user_id = state.cashier.register_user(name, tier)?;
    info!(user_id = %user_id, "register_user complete");
    Ok(RegisteredUserDto { user_id })
}

pub fn get_user(state: &CashierState, user_id: u64) -> Result<UserDto, ApiError> {
    Ok(state.cashier.user(user_id)?.into())
}

pub fn get_balance(state: &CashierState, user_id: u64) -> Result<Balance, ApiError> {
    Ok(state.cashier.balance(user_id)?)
}

// Manual adjustments return the full balance after the change.

pub fn credit_tokens(state: &CashierState, user_id: u64, amount: u64) -> Result<Balance, ApiError> {
    state.cashier.credit_tokens(user_id, amount)?;
    get_balance(state, user_id)
}

pub fn debit_tokens(state: &CashierState, user_id: u64, amount: u64) -> Result<Balance, ApiError> {
    state.cashier.debit_tokens(user_id, amount)?;
    get_balance(state, user_id)
}

pub fn credit_points(state: &CashierState, user_id: u64, amount: u64) -> Result<Balance, ApiError> {
    state.cashier.credit_points(user_id, amount)?;
    get_balance(state, user_id)
}

pub fn debit_points(state: &CashierState, user_id: u64, amount: u64) -> Result<Balance, ApiError> {
    state.cashier.debit_points(user_id, amount)?;
    get_balance(state, user_id)
}
