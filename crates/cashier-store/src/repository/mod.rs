//! # Repository Module
//!
//! In-memory implementations of the cashier-core repository traits.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One lock per store                                   │
//! │                                                                         │
//! │  InMemoryUserRepository      IdSequence + RwLock<HashMap<id, User>>    │
//! │  InMemoryProductRepository   IdSequence + RwLock<HashMap<id, Product>> │
//! │  InMemoryActivityRepository  IdSequence + RwLock<BTreeMap<..>>  × 2    │
//! │                                                                         │
//! │  Readers of one store never block writers of another.                  │
//! │  IDs come from an atomic fetch-and-add, starting at 1.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InMemoryUserRepository`] - Users and the tier discount table
//! - [`InMemoryProductRepository`] - Product catalog
//! - [`InMemoryActivityRepository`] - Token and product activities

use std::sync::atomic::{AtomicU64, Ordering};

pub mod activity;
pub mod product;
pub mod user;

pub use activity::InMemoryActivityRepository;
pub use product::InMemoryProductRepository;
pub use user::InMemoryUserRepository;

/// Hands out 1, 2, 3, ... without ever repeating.
#[derive(Debug, Default)]
pub(crate) struct IdSequence {
    last: AtomicU64,
}

impl IdSequence {
    pub(crate) fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }
}
