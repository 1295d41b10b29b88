//! # Commands Module
//!
//! Every operation the shell exposes, one JSON object per line.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (decoding + dispatch)
//! ├── user.rs      ◄─── Registration, balances, manual credits/debits
//! ├── product.rs   ◄─── Product catalog
//! ├── activity.rs  ◄─── Token and product promotions
//! └── purchase.rs  ◄─── Token and product purchases, revenue ledger
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  stdin line                                                             │
//! │  {"command":"buy_token","userId":1,"quantity":100}                      │
//! │         │                                                               │
//! │         │ serde_json (tag = "command")                                  │
//! │         ▼                                                               │
//! │  Command::BuyToken { user_id: 1, quantity: 100 }                        │
//! │         │                                                               │
//! │         │ dispatch(&state, command)                                     │
//! │         ▼                                                               │
//! │  purchase::buy_token(&state, 1, 100) -> Result<ChargeDto, ApiError>     │
//! │         │                                                               │
//! │         │ Response::from(result)                                        │
//! │         ▼                                                               │
//! │  stdout line                                                            │
//! │  {"ok":true,"data":{"charge":100,"balance":{"tokens":100,"points":0}}}  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod activity;
pub mod product;
pub mod purchase;
pub mod user;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cashier_core::MemberTier;

use crate::error::ApiError;
use crate::state::CashierState;

// =============================================================================
// Request Types
// =============================================================================

/// A member tier as sent by callers: a level (`0`-`3`) or a name (`"vip2"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TierInput {
    Level(u8),
    Name(String),
}

impl TryFrom<TierInput> for MemberTier {
    type Error = ApiError;

    fn try_from(input: TierInput) -> Result<Self, Self::Error> {
        let tier = match input {
            TierInput::Level(level) => MemberTier::try_from(level)?,
            TierInput::Name(name) => name.parse::<MemberTier>()?,
        };
        Ok(tier)
    }
}

/// One decoded input line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    // Users & balances
    #[serde(rename_all = "camelCase")]
    RegisterUser { name: String, tier: TierInput },
    #[serde(rename_all = "camelCase")]
    GetUser { user_id: u64 },
    #[serde(rename_all = "camelCase")]
    GetBalance { user_id: u64 },
    #[serde(rename_all = "camelCase")]
    CreditTokens { user_id: u64, amount: u64 },
    #[serde(rename_all = "camelCase")]
    DebitTokens { user_id: u64, amount: u64 },
    #[serde(rename_all = "camelCase", alias = "add_point")]
    CreditPoints { user_id: u64, amount: u64 },
    #[serde(rename_all = "camelCase")]
    DebitPoints { user_id: u64, amount: u64 },

    // Catalog
    #[serde(rename_all = "camelCase")]
    CreateProduct { name: String, price: u64 },
    #[serde(rename_all = "camelCase")]
    GetProduct { product_id: u64 },

    // Activities
    #[serde(rename_all = "camelCase")]
    CreateTokenActivity {
        tier: TierInput,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        discount: u8,
    },
    #[serde(rename_all = "camelCase")]
    CreateProductActivity {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        discount: u8,
    },
    #[serde(rename_all = "camelCase")]
    GetTokenActivity { activity_id: u64 },
    #[serde(rename_all = "camelCase")]
    GetProductActivity { activity_id: u64 },
    ListTokenActivities,
    ListProductActivities,

    // Purchases
    #[serde(rename_all = "camelCase")]
    BuyToken { user_id: u64, quantity: u64 },
    #[serde(rename_all = "camelCase")]
    BuyTokenWithActivity {
        user_id: u64,
        quantity: u64,
        /// Evaluate activity windows at this instant instead of now.
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    BuyProduct { user_id: u64, product_id: u64 },
    #[serde(rename_all = "camelCase")]
    QuoteProductWithActivity {
        user_id: u64,
        product_id: u64,
        activity_id: u64,
    },
    #[serde(rename_all = "camelCase")]
    BuyProductWithActivity {
        user_id: u64,
        product_id: u64,
        activity_id: u64,
    },
    TotalAmount,
}

impl Command {
    /// Decodes one input line.
    pub fn parse(line: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(line)?)
    }
}

// =============================================================================
// Response Envelope
// =============================================================================

/// One output line.
///
/// ```json
/// {"ok":true,"data":{"userId":1}}
/// {"ok":false,"error":{"code":"NOT_FOUND","message":"User not found: 9"}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Ok { ok: bool, data: Value },
    Err { ok: bool, error: ApiError },
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response::Ok { ok: true, data }
    }

    pub fn failure(error: ApiError) -> Self {
        Response::Err { ok: false, error }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }
}

impl From<Result<Value, ApiError>> for Response {
    fn from(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => Response::success(data),
            Err(error) => Response::failure(error),
        }
    }
}

fn to_value<T: Serialize>(data: T) -> Result<Value, ApiError> {
    serde_json::to_value(data).map_err(|e| ApiError::internal(e.to_string()))
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs one command against the state and returns its JSON payload.
pub fn dispatch(state: &CashierState, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::RegisterUser { name, tier } => to_value(user::register_user(state, &name, tier)?),
        Command::GetUser { user_id } => to_value(user::get_user(state, user_id)?),
        Command::GetBalance { user_id } => to_value(user::get_balance(state, user_id)?),
        Command::CreditTokens { user_id, amount } => {
            to_value(user::credit_tokens(state, user_id, amount)?)
        }
        Command::DebitTokens { user_id, amount } => {
            to_value(user::debit_tokens(state, user_id, amount)?)
        }
        Command::CreditPoints { user_id, amount } => {
            to_value(user::credit_points(state, user_id, amount)?)
        }
        Command::DebitPoints { user_id, amount } => {
            to_value(user::debit_points(state, user_id, amount)?)
        }

        Command::CreateProduct { name, price } => {
            to_value(product::create_product(state, &name, price)?)
        }
        Command::GetProduct { product_id } => to_value(product::get_product(state, product_id)?),

        Command::CreateTokenActivity {
            tier,
            start,
            end,
            discount,
        } => to_value(activity::create_token_activity(state, tier, start, end, discount)?),
        Command::CreateProductActivity {
            start,
            end,
            discount,
        } => to_value(activity::create_product_activity(state, start, end, discount)?),
        Command::GetTokenActivity { activity_id } => {
            to_value(activity::get_token_activity(state, activity_id)?)
        }
        Command::GetProductActivity { activity_id } => {
            to_value(activity::get_product_activity(state, activity_id)?)
        }
        Command::ListTokenActivities => to_value(activity::list_token_activities(state)?),
        Command::ListProductActivities => to_value(activity::list_product_activities(state)?),

        Command::BuyToken { user_id, quantity } => {
            to_value(purchase::buy_token(state, user_id, quantity)?)
        }
        Command::BuyTokenWithActivity {
            user_id,
            quantity,
            at,
        } => to_value(purchase::buy_token_with_activity(state, user_id, quantity, at)?),
        Command::BuyProduct {
            user_id,
            product_id,
        } => to_value(purchase::buy_product(state, user_id, product_id)?),
        Command::QuoteProductWithActivity {
            user_id,
            product_id,
            activity_id,
        } => to_value(purchase::quote_product_with_activity(
            state,
            user_id,
            product_id,
            activity_id,
        )?),
        Command::BuyProductWithActivity {
            user_id,
            product_id,
            activity_id,
        } => to_value(purchase::buy_product_with_activity(
            state,
            user_id,
            product_id,
            activity_id,
        )?),
        Command::TotalAmount => to_value(purchase::total_amount(state)),
    }
}

/// Decodes, dispatches, and wraps one input line.
pub fn handle_line(state: &CashierState, line: &str) -> Response {
    Command::parse(line)
        .and_then(|command| dispatch(state, command))
        .into()
}
