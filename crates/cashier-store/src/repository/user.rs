//! # User Repository
//!
//! Stores users and answers the tier default discount lookup.
//!
//! ## Shared Accounts
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HashMap<UserId, User>                                                  │
//! │                                                                         │
//! │  get(1) ──► User { .., account: Arc<Account> } (clone)                 │
//! │                                 │                                       │
//! │                                 └──► same Account as the stored user   │
//! │                                                                         │
//! │  Balance updates go through the account's own lock, so the map's       │
//! │  RwLock is only held for the lookup itself.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use cashier_core::{
    Account, DiscountRate, MemberTier, NewUser, PricingPolicy, StoreError, StoreResult, User,
    UserId, UserRepository,
};

use super::IdSequence;

/// In-memory user storage.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    ids: IdSequence,
    users: RwLock<HashMap<UserId, User>>,
    tier_discounts: [DiscountRate; 4],
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::with_tier_discounts(PricingPolicy::default().tier_discounts)
    }
}

impl InMemoryUserRepository {
    /// Creates an empty repository with the standard tier table
    /// (Normal 100, VIP1 95, VIP2 90, VIP3 85).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty repository with a custom tier table, indexed by level.
    pub fn with_tier_discounts(tier_discounts: [DiscountRate; 4]) -> Self {
        InMemoryUserRepository {
            ids: IdSequence::default(),
            users: RwLock::new(HashMap::new()),
            tier_discounts,
        }
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create(&self, user: NewUser) -> StoreResult<UserId> {
        let id = self.ids.next();
        let user = User {
            id,
            name: user.name,
            tier: user.tier,
            default_discount: user.default_discount,
            account: Arc::new(Account::new()),
        };

        self.users
            .write()
            .map_err(|_| StoreError::Poisoned("users"))?
            .insert(id, user);

        debug!(user_id = %id, "User stored");
        Ok(id)
    }

    fn get(&self, id: UserId) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned("users"))?;
        Ok(users.get(&id).cloned())
    }

    fn tier_default_discount(&self, tier: MemberTier) -> DiscountRate {
        self.tier_discounts[tier.level() as usize]
    }
}
