//! # Store Handle
//!
//! Bundles the three in-memory repositories and wires them into a
//! [`Cashier`] engine.

use std::sync::Arc;

use tracing::info;

use cashier_core::{Cashier, PricingPolicy};

use crate::repository::{
    InMemoryActivityRepository, InMemoryProductRepository, InMemoryUserRepository,
};

// =============================================================================
// Store
// =============================================================================

/// Handle to every in-memory repository.
///
/// ## Ownership
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Store                                                                  │
/// │    ├── Arc<InMemoryUserRepository>  ─────┐                              │
/// │    ├── Arc<InMemoryProductRepository> ───┼──► Cashier (Arc<dyn ...>)   │
/// │    └── Arc<InMemoryActivityRepository> ──┘                              │
/// │                                                                         │
/// │  Cloning a Store clones the Arcs: every clone sees the same data.      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Usage
/// ```rust
/// use cashier_core::MemberTier;
/// use cashier_store::Store;
///
/// let cashier = Store::new().cashier();
/// let alice = cashier.register_user("alice", MemberTier::Vip1).unwrap();
/// assert_eq!(cashier.buy_token(alice, 100).unwrap(), 95);
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    users: Arc<InMemoryUserRepository>,
    products: Arc<InMemoryProductRepository>,
    activities: Arc<InMemoryActivityRepository>,
    policy: PricingPolicy,
}

impl Default for Store {
    fn default() -> Self {
        Self::with_policy(&PricingPolicy::default())
    }
}

impl Store {
    /// Creates empty stores with the standard tier table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates empty stores priced by `policy`.
    ///
    /// The user store registers members with `policy`'s tier table, and every
    /// engine from [`Store::cashier`] carries the same policy.
    pub fn with_policy(policy: &PricingPolicy) -> Self {
        Store {
            users: Arc::new(InMemoryUserRepository::with_tier_discounts(
                policy.tier_discounts,
            )),
            products: Arc::new(InMemoryProductRepository::new()),
            activities: Arc::new(InMemoryActivityRepository::new()),
            policy: policy.clone(),
        }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn users(&self) -> Arc<InMemoryUserRepository> {
        Arc::clone(&self.users)
    }

    pub fn products(&self) -> Arc<InMemoryProductRepository> {
        Arc::clone(&self.products)
    }

    pub fn activities(&self) -> Arc<InMemoryActivityRepository> {
        Arc::clone(&self.activities)
    }

    /// Builds a cashier engine over these stores, priced by the store's policy.
    pub fn cashier(&self) -> Cashier {
        let policy = &self.policy;
        info!(
            tiers = ?policy.tier_discounts.map(|rate| rate.percent()),
            bonus_threshold = policy.point_bonus_threshold,
            bonus_rate = policy.point_bonus_rate.percent(),
            "Cashier engine ready"
        );
        Cashier::with_policy(
            self.users(),
            self.products(),
            self.activities(),
            policy.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashier_core::{DiscountRate, MemberTier, UserRepository};

    #[test]
    fn test_clones_share_data() {
        let store = Store::new();
        let clone = store.clone();

        let cashier = store.cashier();
        let id = cashier.register_user("alice", MemberTier::Normal).unwrap();

        assert!(clone.users().get(id).unwrap().is_some());
    }

    #[test]
    fn test_tier_table_follows_policy() {
        let mut policy = PricingPolicy::default();
        policy.tier_discounts[1] = DiscountRate::new(80).unwrap();

        let store = Store::with_policy(&policy);
        let cashier = store.cashier();
        let vip = cashier.register_user("vip", MemberTier::Vip1).unwrap();

        assert_eq!(cashier.buy_token(vip, 100).unwrap(), 80);
    }

    #[test]
    fn test_advertised_rate_is_charged_rate() {
        let mut policy = PricingPolicy::default();
        policy.tier_discounts = [
            DiscountRate::new(90).unwrap(),
            DiscountRate::new(50).unwrap(),
            DiscountRate::new(70).unwrap(),
            DiscountRate::new(60).unwrap(),
        ];

        for store in [Store::new(), Store::with_policy(&policy)] {
            let cashier = store.cashier();
            assert_eq!(cashier.policy(), store.policy());

            for tier in MemberTier::ALL {
                let user = cashier.register_user("member", tier).unwrap();
                let advertised = cashier.policy().default_discount(tier).apply(100);
                assert_eq!(cashier.buy_token(user, 100).unwrap(), advertised, "{tier}");
            }
        }
    }
}
