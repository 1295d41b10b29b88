//! # API Error Type
//!
//! Unified error type returned by every command.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Token Cashier                          │
//! │                                                                         │
//! │  stdin                          Rust shell                              │
//! │  ─────                          ──────────                              │
//! │                                                                         │
//! │  {"command":"buy_product",...}                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Decode line ─── serde_json::Error ──────────► BAD_REQUEST     │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Command fn  Result<T, ApiError>                                 │  │
//! │  │         │                                                        │  │
//! │  │         ├── CashierError::UserNotFound ───────► NOT_FOUND        │  │
//! │  │         ├── CashierError::InsufficientBalance ► INSUFFICIENT_... │  │
//! │  │         ├── CashierError::Validation ─────────► VALIDATION_ERROR │  │
//! │  │         └── CashierError::Store ──────────────► STORE_ERROR      │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stdout                                                                 │
//! │  {"ok":false,"error":{"code":"NOT_FOUND","message":"User not found: 9"}}│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::error;

use cashier_core::{BalanceKind, CashierError, ValidationError};

/// Error returned from a command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_BALANCE",
///   "message": "Insufficient token balance: available 10, required 100",
///   "kind": "token"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Which balance was short or would overflow, for balance errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<BalanceKind>,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// User, product, or activity does not exist
    NotFound,

    /// Input failed validation (names, prices, percentages, tiers)
    ValidationError,

    /// A debit would drive a balance negative
    InsufficientBalance,

    /// A credit would overflow a balance
    BalanceOverflow,

    /// The line was not a well-formed command
    BadRequest,

    /// The backing store failed
    StoreError,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: BalanceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts engine errors to API errors.
impl From<CashierError> for ApiError {
    fn from(err: CashierError) -> Self {
        let message = err.to_string();
        match err {
            CashierError::UserNotFound(_)
            | CashierError::ProductNotFound(_)
            | CashierError::ActivityNotFound(_) => ApiError::new(ErrorCode::NotFound, message),
            CashierError::InsufficientBalance { kind, .. } => {
                ApiError::new(ErrorCode::InsufficientBalance, message).with_kind(kind)
            }
            CashierError::BalanceOverflow { kind } => {
                ApiError::new(ErrorCode::BalanceOverflow, message).with_kind(kind)
            }
            CashierError::Validation(e) => ApiError::from(e),
            CashierError::Store(e) => {
                // Log the actual error but return a generic message
                error!("Store failure: {}", e);
                ApiError::new(ErrorCode::StoreError, "Store operation failed")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Malformed JSON or an unknown command.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use cashier_core::StoreError;

    #[test]
    fn test_not_found_mapping() {
        let err = ApiError::from(CashierError::ProductNotFound(3));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: 3");
    }

    #[test]
    fn test_insufficient_balance_mapping() {
        let err = ApiError::from(CashierError::insufficient_points(5, 20));
        assert_eq!(err.code, ErrorCode::InsufficientBalance);
        assert_eq!(err.kind, Some(BalanceKind::Point));
        assert!(err.message.contains("point"));
    }

    #[test]
    fn test_store_error_hides_details() {
        let err = ApiError::from(CashierError::Store(StoreError::Poisoned("users")));
        assert_eq!(err.code, ErrorCode::StoreError);
        assert_eq!(err.message, "Store operation failed");
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::from(CashierError::insufficient_tokens(10, 100));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_BALANCE");
        assert_eq!(
            json["message"],
            "Insufficient token balance: available 10, required 100"
        );
        assert_eq!(json["kind"], "token");

        let json = serde_json::to_value(ApiError::from(CashierError::UserNotFound(1))).unwrap();
        assert!(json.get("kind").is_none());
    }
}
