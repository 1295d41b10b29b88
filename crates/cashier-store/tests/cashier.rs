//! End-to-end tests for the cashier engine over the in-memory stores.

use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Duration, Utc};

use cashier_core::{
    Balance, BalanceKind, Cashier, CashierError, DiscountRate, MemberTier, PointDiscount, PricingPolicy,
    ValidationError,
};
use cashier_store::Store;

// =============================================================================
// Helpers
// =============================================================================

fn cashier() -> Cashier {
    Store::new().cashier()
}

fn rate(pct: u8) -> DiscountRate {
    DiscountRate::new(pct).unwrap()
}

fn points_off(pct: u8) -> PointDiscount {
    PointDiscount::new(pct).unwrap()
}

fn next_30_days() -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Utc::now();
    (now - Duration::seconds(1), now + Duration::days(30))
}

fn assert_insufficient(err: CashierError, expected_kind: BalanceKind) {
    match err {
        CashierError::InsufficientBalance { kind, .. } => assert_eq!(kind, expected_kind),
        other => panic!("expected insufficient {expected_kind} balance, got {other:?}"),
    }
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_register_user_returns_first_id() {
    let cashier = cashier();
    assert_eq!(cashier.register_user("testName", MemberTier::Normal).unwrap(), 1);
    assert_eq!(cashier.register_user("other", MemberTier::Vip3).unwrap(), 2);
}

#[test]
fn test_new_user_snapshot() {
    let cashier = cashier();
    let id = cashier.register_user("  alice  ", MemberTier::Vip2).unwrap();

    let user = cashier.user(id).unwrap();
    assert_eq!(user.name, "alice");
    assert_eq!(user.tier, MemberTier::Vip2);
    assert_eq!(user.default_discount.percent(), 90);
    assert_eq!(user.balance.tokens, 0);
    assert_eq!(user.balance.points, 0);
}

#[test]
fn test_register_user_rejects_blank_name() {
    let cashier = cashier();
    let err = cashier.register_user("   ", MemberTier::Normal).unwrap_err();
    assert!(matches!(err, CashierError::Validation(ValidationError::Required { .. })));
}

#[test]
fn test_create_product_validates_input() {
    let cashier = cashier();
    assert!(matches!(
        cashier.create_product("free lunch", 0).unwrap_err(),
        CashierError::Validation(ValidationError::MustBePositive { .. })
    ));
    assert!(matches!(
        cashier.create_product("", 10).unwrap_err(),
        CashierError::Validation(ValidationError::Required { .. })
    ));

    let id = cashier.create_product("testProduct1", 100).unwrap();
    assert_eq!(cashier.product(id).unwrap().price, 100);
}

// =============================================================================
// Token Purchases
// =============================================================================

#[test]
fn test_buy_token_at_tier_rate() {
    for (tier, expected) in [
        (MemberTier::Normal, 100),
        (MemberTier::Vip1, 95),
        (MemberTier::Vip2, 90),
        (MemberTier::Vip3, 85),
    ] {
        let cashier = cashier();
        let user = cashier.register_user("testUser", tier).unwrap();

        assert_eq!(cashier.buy_token(user, 100).unwrap(), expected, "tier {tier}");
        assert_eq!(cashier.token_balance(user).unwrap(), 100);
        assert_eq!(cashier.total_amount(), expected);
    }
}

#[test]
fn test_buy_token_rounds_down() {
    let cashier = cashier();
    let user = cashier.register_user("vip1", MemberTier::Vip1).unwrap();
    // 7 × 95 / 100 = 6.65
    assert_eq!(cashier.buy_token(user, 7).unwrap(), 6);
}

#[test]
fn test_buy_token_unknown_user() {
    let cashier = cashier();
    assert!(matches!(cashier.buy_token(42, 100).unwrap_err(), CashierError::UserNotFound(42)));
    assert_eq!(cashier.total_amount(), 0);
}

#[test]
fn test_buy_token_with_activity_for_tier() {
    for tier in [MemberTier::Normal, MemberTier::Vip3] {
        let cashier = cashier();
        let user = cashier.register_user("testUser", tier).unwrap();
        let (start, end) = next_30_days();
        cashier.create_token_activity(tier, start, end, rate(50)).unwrap();

        assert_eq!(cashier.buy_token_with_activity(user, 100).unwrap(), 50);
        assert_eq!(cashier.token_balance(user).unwrap(), 100);
    }
}

#[test]
fn test_buy_token_with_activity_picks_cheapest() {
    let cashier = cashier();
    let user = cashier.register_user("testUser", MemberTier::Vip3).unwrap();
    let (start, end) = next_30_days();
    for pct in [90, 85, 80, 75] {
        cashier.create_token_activity(MemberTier::Vip3, start, end, rate(pct)).unwrap();
    }

    assert_eq!(cashier.buy_token_with_activity(user, 100).unwrap(), 75);
    assert_eq!(cashier.total_amount(), 75);
}

#[test]
fn test_buy_token_with_activity_ignores_other_tiers() {
    let cashier = cashier();
    let user = cashier.register_user("testUser", MemberTier::Vip2).unwrap();
    let (start, end) = next_30_days();
    cashier.create_token_activity(MemberTier::Vip3, start, end, rate(10)).unwrap();

    // Falls back to the VIP2 default
    assert_eq!(cashier.buy_token_with_activity(user, 100).unwrap(), 90);
}

#[test]
fn test_buy_token_with_activity_falls_back_without_activities() {
    let cashier = cashier();
    let user = cashier.register_user("testUser", MemberTier::Vip1).unwrap();

    assert_eq!(cashier.buy_token_with_activity(user, 100).unwrap(), 95);
    assert_eq!(cashier.token_balance(user).unwrap(), 100);
}

#[test]
fn test_activity_window_is_half_open() {
    let cashier = cashier();
    let user = cashier.register_user("testUser", MemberTier::Normal).unwrap();

    let start = Utc::now();
    let end = start + Duration::hours(1);
    cashier.create_token_activity(MemberTier::Normal, start, end, rate(50)).unwrap();

    let before = start - Duration::seconds(1);
    assert_eq!(cashier.buy_token_with_activity_at(user, 100, before).unwrap(), 100);
    assert_eq!(cashier.buy_token_with_activity_at(user, 100, start).unwrap(), 50);
    let inside = start + Duration::minutes(30);
    assert_eq!(cashier.buy_token_with_activity_at(user, 100, inside).unwrap(), 50);
    assert_eq!(cashier.buy_token_with_activity_at(user, 100, end).unwrap(), 100);

    assert_eq!(cashier.token_balance(user).unwrap(), 400);
    assert_eq!(cashier.total_amount(), 300);
}

#[test]
fn test_expired_activity_is_ignored() {
    let cashier = cashier();
    let user = cashier.register_user("testUser", MemberTier::Vip3).unwrap();
    let now = Utc::now();
    cashier
        .create_token_activity(MemberTier::Vip3, now - Duration::days(2), now - Duration::days(1), rate(10))
        .unwrap();

    assert_eq!(cashier.buy_token_with_activity(user, 100).unwrap(), 85);
}

// =============================================================================
// Product Purchases
// =============================================================================

#[test]
fn test_buy_product_debits_tokens() {
    let cashier = cashier();
    let first = cashier.register_user("testUser1", MemberTier::Normal).unwrap();
    let second = cashier.register_user("testUser2", MemberTier::Normal).unwrap();
    cashier.buy_token(first, 1000).unwrap();
    cashier.buy_token(second, 1000).unwrap();
    let product = cashier.create_product("testProduct1", 100).unwrap();
    cashier.create_product("testProduct2", 150).unwrap();
    cashier.create_product("testProduct3", 200).unwrap();

    assert_eq!(cashier.buy_product(first, product).unwrap(), 100);
    assert_eq!(cashier.token_balance(first).unwrap(), 900);
    assert_eq!(cashier.token_balance(second).unwrap(), 1000);
    assert_eq!(cashier.total_amount(), 2000);
}

#[test]
fn test_buy_product_with_insufficient_tokens() {
    let cashier = cashier();
    let user = cashier.register_user("testUser1", MemberTier::Normal).unwrap();
    cashier.buy_token(user, 10).unwrap();
    let product = cashier.create_product("testProduct1", 100).unwrap();

    let err = cashier.buy_product(user, product).unwrap_err();
    assert_insufficient(err, BalanceKind::Token);
    assert_eq!(cashier.token_balance(user).unwrap(), 10);
    assert_eq!(cashier.total_amount(), 10);
}

#[test]
fn test_buy_product_as_vip_does_not_touch_ledger() {
    let cashier = cashier();
    let user = cashier.register_user("testUser1", MemberTier::Vip1).unwrap();
    cashier.register_user("testUser2", MemberTier::Vip1).unwrap();
    cashier.buy_token(user, 1000).unwrap();
    let product = cashier.create_product("testProduct1", 100).unwrap();

    assert_eq!(cashier.buy_product(user, product).unwrap(), 100);
    assert_eq!(cashier.token_balance(user).unwrap(), 900);
    assert_eq!(cashier.total_amount(), 950);
}

#[test]
fn test_buy_product_not_found() {
    let cashier = cashier();
    let user = cashier.register_user("testUser", MemberTier::Normal).unwrap();

    assert!(matches!(cashier.buy_product(user, 9).unwrap_err(), CashierError::ProductNotFound(9)));
    assert!(matches!(cashier.buy_product(9, 1).unwrap_err(), CashierError::UserNotFound(9)));
}

#[test]
fn test_buy_product_with_activity_normal_member() {
    let cashier = cashier();
    let user = cashier.register_user("testUser1", MemberTier::Normal).unwrap();
    cashier.buy_token(user, 1000).unwrap();
    cashier.credit_points(user, 100).unwrap();
    let product = cashier.create_product("testProduct1", 100).unwrap();
    cashier.create_product("testProduct2", 150).unwrap();
    let (start, end) = next_30_days();
    let activity = cashier.create_product_activity(start, end, points_off(90)).unwrap();

    assert_eq!(cashier.buy_product_with_activity(user, product, activity).unwrap().tokens, 90);
    assert_eq!(cashier.token_balance(user).unwrap(), 910);
    assert_eq!(cashier.point_balance(user).unwrap(), 90);
}

#[test]
fn test_buy_product_with_activity_vip_below_bonus_threshold() {
    let cashier = cashier();
    let user = cashier.register_user("testUser1", MemberTier::Vip1).unwrap();
    cashier.buy_token(user, 10000).unwrap();
    cashier.credit_points(user, 1000).unwrap();
    let product = cashier.create_product("testProduct1", 100).unwrap();
    let (start, end) = next_30_days();
    let activity = cashier.create_product_activity(start, end, points_off(90)).unwrap();

    assert_eq!(cashier.buy_product_with_activity(user, product, activity).unwrap().tokens, 90);
    assert_eq!(cashier.token_balance(user).unwrap(), 9910);
    assert_eq!(cashier.point_balance(user).unwrap(), 990);
    assert_eq!(cashier.total_amount(), 9500);
}

#[test]
fn test_buy_product_with_activity_vip_bonus() {
    let cashier = cashier();
    let user = cashier.register_user("testUser1", MemberTier::Vip1).unwrap();
    cashier.buy_token(user, 10000).unwrap();
    cashier.credit_points(user, 1000).unwrap();
    let product = cashier.create_product("testProduct1", 1000).unwrap();
    let (start, end) = next_30_days();
    let activity = cashier.create_product_activity(start, end, points_off(80)).unwrap();

    // 200 points > 100, so the 800 token remainder is billed at 90%
    assert_eq!(cashier.buy_product_with_activity(user, product, activity).unwrap().tokens, 720);
    assert_eq!(cashier.token_balance(user).unwrap(), 9280);
    assert_eq!(cashier.point_balance(user).unwrap(), 800);
    assert_eq!(cashier.total_amount(), 9500);
}

#[test]
fn test_normal_member_never_gets_point_bonus() {
    let cashier = cashier();
    let user = cashier.register_user("testUser1", MemberTier::Normal).unwrap();
    cashier.buy_token(user, 10000).unwrap();
    cashier.credit_points(user, 1000).unwrap();
    let product = cashier.create_product("testProduct1", 1000).unwrap();
    let (start, end) = next_30_days();
    let activity = cashier.create_product_activity(start, end, points_off(80)).unwrap();

    assert_eq!(cashier.buy_product_with_activity(user, product, activity).unwrap().tokens, 800);
    assert_eq!(cashier.point_balance(user).unwrap(), 800);
}

#[test]
fn test_quote_matches_purchase_without_debiting() {
    let cashier = cashier();
    let user = cashier.register_user("testUser1", MemberTier::Vip2).unwrap();
    cashier.buy_token(user, 10000).unwrap();
    cashier.credit_points(user, 1000).unwrap();
    let product = cashier.create_product("testProduct1", 1000).unwrap();
    let (start, end) = next_30_days();
    let activity = cashier.create_product_activity(start, end, points_off(80)).unwrap();

    let quote = cashier.quote_product_with_activity(user, product, activity).unwrap();
    assert_eq!((quote.points, quote.tokens), (200, 720));
    assert_eq!(cashier.token_balance(user).unwrap(), 10000);

    let charged = cashier.buy_product_with_activity(user, product, activity).unwrap();
    assert_eq!(charged, quote);
}

#[test]
fn test_buy_product_with_activity_is_all_or_nothing() {
    let cashier = cashier();
    let user = cashier.register_user("testUser1", MemberTier::Normal).unwrap();
    cashier.credit_points(user, 100).unwrap();
    cashier.buy_token(user, 10).unwrap();
    let product = cashier.create_product("testProduct1", 100).unwrap();
    let (start, end) = next_30_days();
    let activity = cashier.create_product_activity(start, end, points_off(90)).unwrap();

    // 10 points are fine, 90 tokens are not
    let err = cashier.buy_product_with_activity(user, product, activity).unwrap_err();
    assert_insufficient(err, BalanceKind::Token);
    assert_eq!(cashier.point_balance(user).unwrap(), 100);
    assert_eq!(cashier.token_balance(user).unwrap(), 10);
}

#[test]
fn test_buy_product_with_activity_short_on_points() {
    let cashier = cashier();
    let user = cashier.register_user("testUser1", MemberTier::Normal).unwrap();
    cashier.buy_token(user, 1000).unwrap();
    let product = cashier.create_product("testProduct1", 100).unwrap();
    let (start, end) = next_30_days();
    let activity = cashier.create_product_activity(start, end, points_off(50)).unwrap();

    let err = cashier.buy_product_with_activity(user, product, activity).unwrap_err();
    assert_insufficient(err, BalanceKind::Point);
    assert_eq!(cashier.token_balance(user).unwrap(), 1000);
}

#[test]
fn test_buy_product_with_unknown_activity() {
    let cashier = cashier();
    let user = cashier.register_user("testUser1", MemberTier::Normal).unwrap();
    let product = cashier.create_product("testProduct1", 100).unwrap();
    let (start, end) = next_30_days();
    // A token activity with ID 1 does not make product activity 1 exist
    cashier.create_token_activity(MemberTier::Normal, start, end, rate(50)).unwrap();

    assert!(matches!(
        cashier.buy_product_with_activity(user, product, 1).unwrap_err(),
        CashierError::ActivityNotFound(1)
    ));
}

#[test]
fn test_activity_ids_are_numbered_per_kind() {
    let cashier = cashier();
    let (start, end) = next_30_days();

    assert_eq!(cashier.create_token_activity(MemberTier::Normal, start, end, rate(90)).unwrap(), 1);
    assert_eq!(cashier.create_product_activity(start, end, points_off(90)).unwrap(), 1);
    assert_eq!(cashier.create_token_activity(MemberTier::Vip1, start, end, rate(80)).unwrap(), 2);
    assert_eq!(cashier.token_activities().unwrap().len(), 2);
    assert_eq!(cashier.product_activity(1).unwrap().discount.percent(), 90);
}

// =============================================================================
// Balances
// =============================================================================

#[test]
fn test_manual_balance_updates() {
    let cashier = cashier();
    let user = cashier.register_user("testUser", MemberTier::Normal).unwrap();

    assert_eq!(cashier.credit_tokens(user, 50).unwrap(), 50);
    assert_eq!(cashier.debit_tokens(user, 20).unwrap(), 30);
    assert_eq!(cashier.credit_points(user, 10).unwrap(), 10);
    assert_eq!(cashier.debit_points(user, 10).unwrap(), 0);
    assert_insufficient(cashier.debit_points(user, 1).unwrap_err(), BalanceKind::Point);

    // Manual credits are not revenue
    assert_eq!(cashier.total_amount(), 0);
}

#[test]
fn test_custom_policy_bonus() {
    let policy = PricingPolicy {
        point_bonus_threshold: 10,
        point_bonus_rate: rate(50),
        ..PricingPolicy::default()
    };
    let cashier = Store::with_policy(&policy).cashier();
    let user = cashier.register_user("vip", MemberTier::Vip3).unwrap();
    cashier.buy_token(user, 1000).unwrap();
    cashier.credit_points(user, 100).unwrap();
    let product = cashier.create_product("testProduct1", 100).unwrap();
    let (start, end) = next_30_days();
    let activity = cashier.create_product_activity(start, end, points_off(80)).unwrap();

    // 20 points > 10, remainder 80 at 50%
    assert_eq!(cashier.buy_product_with_activity(user, product, activity).unwrap().tokens, 40);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_purchases_never_overdraw() {
    let cashier = Arc::new(cashier());
    let user = cashier.register_user("shared", MemberTier::Normal).unwrap();
    cashier.buy_token(user, 1000).unwrap();
    let product = cashier.create_product("testProduct1", 30).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cashier = Arc::clone(&cashier);
            thread::spawn(move || {
                (0..10)
                    .filter(|_| cashier.buy_product(user, product).is_ok())
                    .count()
            })
        })
        .collect();

    let bought: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    // 1000 / 30 = 33 purchases fit
    assert_eq!(bought, 33);
    assert_eq!(cashier.token_balance(user).unwrap(), 1000 - 33 * 30);
}

#[test]
fn test_concurrent_blended_purchases_never_overdraw() {
    let cashier = Arc::new(cashier());
    let user = cashier.register_user("shared", MemberTier::Normal).unwrap();
    cashier.buy_token(user, 1850).unwrap();
    cashier.credit_points(user, 205).unwrap();
    let product = cashier.create_product("testProduct1", 100).unwrap();
    let (start, end) = next_30_days();
    let activity = cashier.create_product_activity(start, end, points_off(90)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cashier = Arc::clone(&cashier);
            thread::spawn(move || {
                (0..5)
                    .filter(|_| cashier.buy_product_with_activity(user, product, activity).is_ok())
                    .count()
            })
        })
        .collect();

    let bought: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    // Each purchase takes 10 points and 90 tokens; both run out after 20
    assert_eq!(bought, 20);
    assert_eq!(cashier.balance(user).unwrap(), Balance { tokens: 50, points: 5 });
}

#[test]
fn test_concurrent_token_sales_sum_into_ledger() {
    let cashier = Arc::new(cashier());
    let users: Vec<_> = MemberTier::ALL
        .iter()
        .map(|tier| cashier.register_user("buyer", *tier).unwrap())
        .collect();

    let handles: Vec<_> = users
        .iter()
        .map(|&user| {
            let cashier = Arc::clone(&cashier);
            thread::spawn(move || (0..50).map(|_| cashier.buy_token(user, 100).unwrap()).sum::<u64>())
        })
        .collect();

    let charged: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(charged, 50 * (100 + 95 + 90 + 85));
    assert_eq!(cashier.total_amount(), charged);
    for user in users {
        assert_eq!(cashier.token_balance(user).unwrap(), 5000);
    }
}
