//! # Error Types
//!
//! Domain-specific error types for cashier-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cashier-core errors (this file)                                        │
//! │  ├── CashierError     - Engine failures (not found, balance, ...)      │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── StoreError       - Repository backend failures                    │
//! │                                                                         │
//! │  cashier-cli errors (in app)                                           │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError / StoreError → CashierError → ApiError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (user ID, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every failed balance check leaves state untouched

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ActivityId, ProductId, UserId};

// =============================================================================
// Balance Kind
// =============================================================================

/// Which side of an account a balance check ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceKind {
    /// Platform tokens (bought with money).
    Token,
    /// Loyalty points.
    Point,
}

impl std::fmt::Display for BalanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceKind::Token => write!(f, "token"),
            BalanceKind::Point => write!(f, "point"),
        }
    }
}

// =============================================================================
// Cashier Error
// =============================================================================

/// Errors returned by the cashier engine.
///
/// None of these is fatal: the caller can always recover by issuing a
/// different request.
#[derive(Debug, Error)]
pub enum CashierError {
    /// No user is registered under this ID.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// No product is registered under this ID.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// No activity of the requested kind is registered under this ID.
    #[error("Activity not found: {0}")]
    ActivityNotFound(ActivityId),

    /// A debit would drive a balance negative.
    ///
    /// ## User Workflow
    /// ```text
    /// buy_product(user 1, product 1)
    ///      │
    ///      ▼
    /// Check tokens: available=10, price=100
    ///      │
    ///      ▼
    /// InsufficientBalance { kind: Token, available: 10, required: 100 }
    ///      │
    ///      ▼
    /// Balance stays 10, ledger untouched
    /// ```
    #[error("Insufficient {kind} balance: available {available}, required {required}")]
    InsufficientBalance {
        kind: BalanceKind,
        available: u64,
        required: u64,
    },

    /// A credit would push a balance past `u64::MAX`.
    #[error("{kind} balance overflow")]
    BalanceOverflow { kind: BalanceKind },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl CashierError {
    /// Creates an insufficient token balance error.
    pub fn insufficient_tokens(available: u64, required: u64) -> Self {
        CashierError::InsufficientBalance {
            kind: BalanceKind::Token,
            available,
            required,
        }
    }

    /// Creates an insufficient point balance error.
    pub fn insufficient_points(available: u64, required: u64) -> Self {
        CashierError::InsufficientBalance {
            kind: BalanceKind::Point,
            available,
            required,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Store Error
// =============================================================================

/// Failures raised by a repository implementation.
///
/// The in-memory stores only fail when a lock was poisoned by a panicking
/// writer; persistent backends map their driver errors to `Unavailable`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A lock guarding the named store was poisoned.
    #[error("Lock poisoned: {0}")]
    Poisoned(&'static str),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CashierError.
pub type CashierResult<T> = Result<T, CashierError>;

/// Result type for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
