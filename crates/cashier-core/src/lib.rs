//! # cashier-core: Pure Business Logic for Token Cashier
//!
//! This crate is the **heart** of Token Cashier: a loyalty ledger where users
//! buy platform tokens, earn points, and spend both on products under
//! time-bounded promotions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Token Cashier Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cashier-cli (JSON lines)                     │   │
//! │  │    register_user, buy_token, buy_product_with_activity, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cashier-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │ pricing │ │ account │ │repository│ │cashier │  │   │
//! │  │   │  User   │ │Discount │ │ Balance │ │  traits  │ │ engine │  │   │
//! │  │   │Activity │ │ Policy  │ │  Mutex  │ │          │ │ ledger │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO GLOBAL STATE          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                cashier-store (in-memory repositories)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, activities, MemberTier)
//! - [`pricing`] - Discount percentages and the pricing rules
//! - [`account`] - Token/point balances behind one lock
//! - [`repository`] - Storage contracts the engine depends on
//! - [`cashier`] - The cashier engine and revenue ledger
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cashier_core::pricing::PricingPolicy;
//! use cashier_core::MemberTier;
//!
//! let policy = PricingPolicy::default();
//!
//! // VIP3 pays 85% of face value for tokens
//! assert_eq!(policy.default_discount(MemberTier::Vip3).apply(100), 85);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod cashier;
pub mod error;
pub mod pricing;
pub mod repository;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use account::{Account, Balance};
pub use cashier::Cashier;
pub use error::{
    BalanceKind, CashierError, CashierResult, StoreError, StoreResult, ValidationError,
};
pub use pricing::{DiscountRate, PointDiscount, PricingPolicy, ProductSplit};
pub use repository::{ActivityRepository, ProductRepository, UserRepository};
pub use types::*;
