//! # Cashier Engine
//!
//! Orchestrates registrations, balance updates, and purchases against the
//! three repositories, and owns the revenue ledger.
//!
//! ## Purchase Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashier Operations                               │
//! │                                                                         │
//! │  buy_token ─────────────► tier default rate ──────┐                    │
//! │                                                    ├─► credit tokens    │
//! │  buy_token_with_activity ► cheapest in-window      │   ledger += charge │
//! │                            activity for the tier ──┘                    │
//! │                            (falls back to default)                      │
//! │                                                                         │
//! │  buy_product ───────────► debit price in tokens        (no ledger)     │
//! │                                                                         │
//! │  buy_product_with_activity ► split price into points + tokens          │
//! │                              debit both under one lock  (no ledger)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Revenue Recognition
//! Money enters the system only when tokens are bought. Spending tokens on a
//! product moves no new money, so product purchases never touch the ledger.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::account::Balance;
use crate::error::{CashierError, CashierResult};
use crate::pricing::{best_activity_charge, DiscountRate, PointDiscount, PricingPolicy, ProductSplit};
use crate::repository::{ActivityRepository, ProductRepository, UserRepository};
use crate::types::{
    is_within_period, ActivityId, MemberTier, NewProduct, NewProductPurchaseActivity,
    NewTokenPurchaseActivity, NewUser, Period, Product, ProductId, ProductPurchaseActivity,
    TokenPurchaseActivity, User, UserId, UserSnapshot,
};
use crate::validation::{validate_price, validate_product_name, validate_user_name};

/// The cashier use case.
///
/// ## Usage
/// ```rust,ignore
/// let cashier = Cashier::new(users, products, activities);
///
/// let alice = cashier.register_user("alice", MemberTier::Vip2)?;
/// let charge = cashier.buy_token(alice, 100)?; // 90
/// assert_eq!(cashier.total_amount(), 90);
/// ```
pub struct Cashier {
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
    activities: Arc<dyn ActivityRepository>,
    policy: PricingPolicy,
    /// Tokens sold, summed over every successful token purchase.
    total_amount: AtomicU64,
}

impl std::fmt::Debug for Cashier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cashier")
            .field("policy", &self.policy)
            .field("total_amount", &self.total_amount())
            .finish_non_exhaustive()
    }
}

impl Cashier {
    /// Creates an engine with the default pricing policy and an empty ledger.
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        activities: Arc<dyn ActivityRepository>,
    ) -> Self {
        Self::with_policy(users, products, activities, PricingPolicy::default())
    }

    /// Creates an engine with a custom pricing policy.
    ///
    /// Registration reads its tier table from `users`, so `policy.tier_discounts`
    /// must be the same table the user repository was built with.
    pub fn with_policy(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        activities: Arc<dyn ActivityRepository>,
        policy: PricingPolicy,
    ) -> Self {
        Cashier {
            users,
            products,
            activities,
            policy,
            total_amount: AtomicU64::new(0),
        }
    }

    /// The pricing policy in effect.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Cumulative revenue from token purchases.
    pub fn total_amount(&self) -> u64 {
        self.total_amount.load(Ordering::SeqCst)
    }

    fn record_charge(&self, charge: u64) {
        self.total_amount.fetch_add(charge, Ordering::SeqCst);
    }

    fn find_user(&self, id: UserId) -> CashierResult<User> {
        self.users.get(id)?.ok_or(CashierError::UserNotFound(id))
    }

    fn find_product(&self, id: ProductId) -> CashierResult<Product> {
        self.products.get(id)?.ok_or(CashierError::ProductNotFound(id))
    }

    // =========================================================================
    // Users & Balances
    // =========================================================================

    /// Registers a user with zero balances and the tier's default discount.
    pub fn register_user(&self, name: &str, tier: MemberTier) -> CashierResult<UserId> {
        validate_user_name(name)?;

        let default_discount = self.users.tier_default_discount(tier);
        let id = self.users.create(NewUser {
            name: name.trim().to_string(),
            tier,
            default_discount,
        })?;

        info!(user_id = %id, %tier, discount = default_discount.percent(), "Registered user");
        Ok(id)
    }

    /// Returns a snapshot of the user, balances included.
    pub fn user(&self, id: UserId) -> CashierResult<UserSnapshot> {
        Ok(self.find_user(id)?.snapshot()?)
    }

    pub fn balance(&self, id: UserId) -> CashierResult<Balance> {
        let user = self.find_user(id)?;
        let balance = user.account.balance()?;
        debug!(user_id = %id, tokens = balance.tokens, points = balance.points, "Balance read");
        Ok(balance)
    }

    pub fn token_balance(&self, id: UserId) -> CashierResult<u64> {
        Ok(self.balance(id)?.tokens)
    }

    pub fn point_balance(&self, id: UserId) -> CashierResult<u64> {
        Ok(self.balance(id)?.points)
    }

    /// Adds tokens without charging (e.g. a refund). Returns the new balance.
    pub fn credit_tokens(&self, id: UserId, amount: u64) -> CashierResult<u64> {
        self.find_user(id)?.account.credit_tokens(amount)
    }

    pub fn debit_tokens(&self, id: UserId, amount: u64) -> CashierResult<u64> {
        self.find_user(id)?.account.debit_tokens(amount)
    }

    /// Awards loyalty points. Returns the new point balance.
    pub fn credit_points(&self, id: UserId, amount: u64) -> CashierResult<u64> {
        let points = self.find_user(id)?.account.credit_points(amount)?;
        debug!(user_id = %id, amount, points, "Points credited");
        Ok(points)
    }

    pub fn debit_points(&self, id: UserId, amount: u64) -> CashierResult<u64> {
        self.find_user(id)?.account.debit_points(amount)
    }

    // =========================================================================
    // Catalog & Activities
    // =========================================================================

    pub fn create_product(&self, name: &str, price: u64) -> CashierResult<ProductId> {
        validate_product_name(name)?;
        validate_price(price)?;

        let id = self.products.create(NewProduct {
            name: name.trim().to_string(),
            price,
        })?;
        info!(product_id = %id, price, "Created product");
        Ok(id)
    }

    pub fn product(&self, id: ProductId) -> CashierResult<Product> {
        self.find_product(id)
    }

    /// Creates a token purchase promotion for one tier.
    ///
    /// Overlapping activities are legal; purchases pick the cheapest.
    pub fn create_token_activity(
        &self,
        tier: MemberTier,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        discount: DiscountRate,
    ) -> CashierResult<ActivityId> {
        let id = self.activities.create_token_activity(NewTokenPurchaseActivity {
            tier,
            discount,
            period: Period::new(start, end),
        })?;
        info!(activity_id = %id, %tier, discount = discount.percent(), "Created token activity");
        Ok(id)
    }

    /// Creates a product purchase promotion letting points cover part of a price.
    pub fn create_product_activity(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        discount: PointDiscount,
    ) -> CashierResult<ActivityId> {
        let id = self
            .activities
            .create_product_activity(NewProductPurchaseActivity {
                discount,
                period: Period::new(start, end),
            })?;
        info!(activity_id = %id, discount = discount.percent(), "Created product activity");
        Ok(id)
    }

    pub fn token_activity(&self, id: ActivityId) -> CashierResult<TokenPurchaseActivity> {
        self.activities
            .get_token_activity(id)?
            .ok_or(CashierError::ActivityNotFound(id))
    }

    pub fn product_activity(&self, id: ActivityId) -> CashierResult<ProductPurchaseActivity> {
        self.activities
            .get_product_activity(id)?
            .ok_or(CashierError::ActivityNotFound(id))
    }

    pub fn token_activities(&self) -> CashierResult<Vec<TokenPurchaseActivity>> {
        Ok(self.activities.list_token_activities()?)
    }

    pub fn product_activities(&self) -> CashierResult<Vec<ProductPurchaseActivity>> {
        Ok(self.activities.list_product_activities()?)
    }

    // =========================================================================
    // Token Purchases
    // =========================================================================

    fn sell_tokens(&self, user: &User, quantity: u64, charge: u64) -> CashierResult<u64> {
        user.account.credit_tokens(quantity)?;
        self.record_charge(charge);
        Ok(charge)
    }

    /// Sells tokens at the user's tier default rate. Returns the charge.
    pub fn buy_token(&self, user_id: UserId, quantity: u64) -> CashierResult<u64> {
        let user = self.find_user(user_id)?;
        let charge = user.default_discount.apply(quantity);

        self.sell_tokens(&user, quantity, charge)?;
        info!(user_id = %user_id, quantity, charge, "Need to charge");
        Ok(charge)
    }

    /// Sells tokens at the best activity price in effect right now.
    pub fn buy_token_with_activity(&self, user_id: UserId, quantity: u64) -> CashierResult<u64> {
        self.buy_token_with_activity_at(user_id, quantity, Utc::now())
    }

    /// Sells tokens at the best activity price in effect at `moment`.
    ///
    /// ## Selection
    /// ```text
    /// activities for user's tier ──► in window at `moment`? ──► min(quantity × rate / 100)
    ///                                        │
    ///                                        └── none ──► tier default rate
    /// ```
    pub fn buy_token_with_activity_at(
        &self,
        user_id: UserId,
        quantity: u64,
        moment: DateTime<Utc>,
    ) -> CashierResult<u64> {
        let user = self.find_user(user_id)?;
        let candidates = self.activities.list_token_activities_for_tier(user.tier)?;

        let matching = candidates
            .iter()
            .filter(|activity| is_within_period(*activity, moment));

        let charge = match best_activity_charge(quantity, matching) {
            Some(charge) => {
                info!(user_id = %user_id, quantity, charge, "Need to charge");
                charge
            }
            None => {
                let charge = user.default_discount.apply(quantity);
                info!(
                    user_id = %user_id,
                    quantity,
                    charge,
                    "Need to charge (no activity matched, using tier default)"
                );
                charge
            }
        };

        self.sell_tokens(&user, quantity, charge)
    }

    // =========================================================================
    // Product Purchases
    // =========================================================================

    /// Spends tokens on a product at face value. Returns the price.
    pub fn buy_product(&self, user_id: UserId, product_id: ProductId) -> CashierResult<u64> {
        let user = self.find_user(user_id)?;
        let product = self.find_product(product_id)?;

        if let Err(err) = user.account.debit_tokens(product.price) {
            warn!(user_id = %user_id, product_id = %product_id, error = %err, "Product purchase rejected");
            return Err(err);
        }

        info!(user_id = %user_id, product_id = %product_id, price = product.price, "Bought product");
        Ok(product.price)
    }

    /// Prices a blended purchase without touching any balance.
    pub fn quote_product_with_activity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        activity_id: ActivityId,
    ) -> CashierResult<ProductSplit> {
        let user = self.find_user(user_id)?;
        let product = self.find_product(product_id)?;
        let activity = self.product_activity(activity_id)?;

        Ok(self
            .policy
            .split_product_price(product.price, activity.discount, user.tier))
    }

    /// Pays for a product partly with points, partly with tokens.
    ///
    /// Returns the points and tokens charged. Both debits commit together or
    /// not at all.
    pub fn buy_product_with_activity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        activity_id: ActivityId,
    ) -> CashierResult<ProductSplit> {
        let user = self.find_user(user_id)?;
        let product = self.find_product(product_id)?;
        let activity = self.product_activity(activity_id)?;

        let split = self
            .policy
            .split_product_price(product.price, activity.discount, user.tier);

        if let Err(err) = user.account.debit_both(split.points, split.tokens) {
            warn!(
                user_id = %user_id,
                product_id = %product_id,
                activity_id = %activity_id,
                error = %err,
                "Product purchase with activity rejected"
            );
            return Err(err);
        }

        info!(
            user_id = %user_id,
            product_id = %product_id,
            tokens = split.tokens,
            points = split.points,
            "Bought product with activity"
        );
        Ok(split)
    }
}
