//! # Validation Module
//!
//! Input validation for registration requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command decoding (cashier-cli)                               │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── DiscountRate / PointDiscount / MemberTier reject bad values       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cashier engine                                               │
//! │  └── THIS MODULE: names and prices                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Account                                                      │
//! │  └── Balance checks under the account lock                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashier_core::validation::{validate_user_name, validate_price};
//!
//! assert!(validate_user_name("alice").is_ok());
//! assert!(validate_price(0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted user name.
pub const MAX_USER_NAME_LEN: usize = 100;

/// Longest accepted product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

fn validate_name(field: &str, name: &str, max: usize) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a user's display name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 100 characters
pub fn validate_user_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name, MAX_USER_NAME_LEN)
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use cashier_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Gift Card").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("product name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a product price in tokens. Products are never free.
pub fn validate_price(price: u64) -> ValidationResult<()> {
    if price == 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}
