//! # cashier-store: In-Memory Storage for Token Cashier
//!
//! Thread-safe repositories for users, products, and activities, plus a
//! [`Store`] handle that wires them into a [`cashier_core::Cashier`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Token Cashier Data Flow                             │
//! │                                                                         │
//! │  cashier-cli command (buy_product)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Cashier engine (cashier-core)                                         │
//! │       │  dyn UserRepository / ProductRepository / ActivityRepository   │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  cashier-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │    Store      │    │  Repositories │    │  IdSequence  │   │   │
//! │  │   │  (store.rs)   │───►│  user.rs      │◄───│  atomic IDs  │   │   │
//! │  │   │               │    │  product.rs   │    │  from 1      │   │   │
//! │  │   │               │    │  activity.rs  │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The [`Store`] bundle
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust
//! use cashier_core::MemberTier;
//! use cashier_store::Store;
//!
//! let store = Store::new();
//! let cashier = store.cashier();
//!
//! let user = cashier.register_user("bob", MemberTier::Normal).unwrap();
//! cashier.buy_token(user, 1000).unwrap();
//! assert_eq!(cashier.token_balance(user).unwrap(), 1000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use repository::{
    InMemoryActivityRepository, InMemoryProductRepository, InMemoryUserRepository,
};
pub use store::Store;
