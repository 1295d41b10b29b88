//! # Repository Contracts
//!
//! The storage seams the cashier engine depends on.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Cashier engine                                                        │
//! │       │                                                                 │
//! │       │  users.get(1) / products.get(3) / activities.list_...()        │
//! │       ▼                                                                 │
//! │  dyn UserRepository / ProductRepository / ActivityRepository           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cashier-store (in-memory)   or any persistent backend                 │
//! │                                                                         │
//! │  The engine never sees the storage mechanism, only these traits.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups return `Ok(None)` for a missing ID; the engine turns that into the
//! matching `*NotFound` error. `Err` is reserved for backend failures.

use crate::error::StoreResult;
use crate::pricing::DiscountRate;
use crate::types::{
    ActivityId, MemberTier, NewProduct, NewProductPurchaseActivity, NewTokenPurchaseActivity,
    NewUser, Product, ProductId, ProductPurchaseActivity, TokenPurchaseActivity, User, UserId,
};

/// Storage for users.
pub trait UserRepository: Send + Sync {
    /// Stores a new user with zero balances and returns its ID.
    fn create(&self, user: NewUser) -> StoreResult<UserId>;

    /// Looks a user up by ID. The returned account is shared with the store.
    fn get(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Default token-purchase rate for a tier.
    fn tier_default_discount(&self, tier: MemberTier) -> DiscountRate;
}

/// Storage for products.
pub trait ProductRepository: Send + Sync {
    fn create(&self, product: NewProduct) -> StoreResult<ProductId>;

    fn get(&self, id: ProductId) -> StoreResult<Option<Product>>;
}

/// Storage for both activity kinds. Each kind has its own ID sequence.
pub trait ActivityRepository: Send + Sync {
    fn create_token_activity(&self, activity: NewTokenPurchaseActivity)
        -> StoreResult<ActivityId>;

    fn create_product_activity(
        &self,
        activity: NewProductPurchaseActivity,
    ) -> StoreResult<ActivityId>;

    fn get_token_activity(&self, id: ActivityId) -> StoreResult<Option<TokenPurchaseActivity>>;

    fn get_product_activity(&self, id: ActivityId)
        -> StoreResult<Option<ProductPurchaseActivity>>;

    /// All token purchase activities, ordered by ID.
    fn list_token_activities(&self) -> StoreResult<Vec<TokenPurchaseActivity>>;

    /// All product purchase activities, ordered by ID.
    fn list_product_activities(&self) -> StoreResult<Vec<ProductPurchaseActivity>>;

    /// Token purchase activities for one tier, ordered by ID.
    fn list_token_activities_for_tier(
        &self,
        tier: MemberTier,
    ) -> StoreResult<Vec<TokenPurchaseActivity>> {
        Ok(self
            .list_token_activities()?
            .into_iter()
            .filter(|activity| activity.tier == tier)
            .collect())
    }
}
