//! # Pricing Module
//!
//! Percentage types and the pure pricing rules of the cashier.
//!
//! ## Integer Percentages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EVERY PRICE IS   amount × percentage / 100   WITH TRUNCATION          │
//! │                                                                         │
//! │  VIP2 buys 100 tokens at 90%:   100 × 90 / 100 = 90                     │
//! │  VIP3 buys  33 tokens at 85%:    33 × 85 / 100 = 28  (28.05 truncated)  │
//! │                                                                         │
//! │  Multiplication runs in u128 so large quantities cannot overflow.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashier_core::pricing::{DiscountRate, PointDiscount, PricingPolicy};
//! use cashier_core::MemberTier;
//!
//! let policy = PricingPolicy::default();
//! assert_eq!(policy.default_discount(MemberTier::Vip2).apply(100), 90);
//!
//! let split = policy.split_product_price(1000, PointDiscount::new(80).unwrap(), MemberTier::Vip1);
//! assert_eq!((split.points, split.tokens), (200, 720));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{MemberTier, TokenPurchaseActivity};

#[inline]
fn percent_of(amount: u64, pct: u8) -> u64 {
    // pct <= 100, so the result never exceeds `amount`
    (amount as u128 * pct as u128 / 100) as u64
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Percentage of face value that is charged (1-100, lower = cheaper).
///
/// VIP3's default of 85 means "pay 85% of face value".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DiscountRate(u8);

impl DiscountRate {
    /// Face value, no discount.
    pub const FULL: DiscountRate = DiscountRate(100);

    /// Creates a rate, rejecting anything outside 1-100.
    pub fn new(pct: u8) -> Result<Self, ValidationError> {
        if !(1..=100).contains(&pct) {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 1,
                max: 100,
            });
        }
        Ok(DiscountRate(pct))
    }

    #[inline]
    pub const fn percent(&self) -> u8 {
        self.0
    }

    /// Amount charged for `amount` at this rate, truncated.
    #[inline]
    pub fn apply(&self, amount: u64) -> u64 {
        percent_of(amount, self.0)
    }
}

impl TryFrom<u8> for DiscountRate {
    type Error = ValidationError;

    fn try_from(pct: u8) -> Result<Self, Self::Error> {
        DiscountRate::new(pct)
    }
}

impl From<DiscountRate> for u8 {
    fn from(rate: DiscountRate) -> Self {
        rate.0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::FULL
    }
}

// =============================================================================
// Point Discount
// =============================================================================

/// Product-activity discount (0-100).
///
/// `100 - discount` percent of the price must be paid in points; the rest is
/// paid in tokens. A discount of 90 on a 100-token product means 10 points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PointDiscount(u8);

impl PointDiscount {
    pub fn new(pct: u8) -> Result<Self, ValidationError> {
        if pct > 100 {
            return Err(ValidationError::OutOfRange {
                field: "point discount".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(PointDiscount(pct))
    }

    #[inline]
    pub const fn percent(&self) -> u8 {
        self.0
    }

    /// Points needed to cover `price`.
    #[inline]
    pub fn points_for(&self, price: u64) -> u64 {
        percent_of(price, 100 - self.0)
    }
}

impl TryFrom<u8> for PointDiscount {
    type Error = ValidationError;

    fn try_from(pct: u8) -> Result<Self, Self::Error> {
        PointDiscount::new(pct)
    }
}

impl From<PointDiscount> for u8 {
    fn from(discount: PointDiscount) -> Self {
        discount.0
    }
}

// =============================================================================
// Product Split
// =============================================================================

/// How a blended point + token product purchase is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSplit {
    pub points: u64,
    pub tokens: u64,
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// The tunable constants of the pricing rules.
///
/// ## Defaults
/// ```text
/// Tier      Default token discount
/// ───────   ──────────────────────
/// Normal    100 (face value)
/// VIP1       95
/// VIP2       90
/// VIP3       85
///
/// VIP point bonus: points > 100  →  token portion × 90%
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Default token-purchase rate, indexed by tier level.
    pub tier_discounts: [DiscountRate; 4],

    /// VIP members spending strictly more points than this get the bonus.
    pub point_bonus_threshold: u64,

    /// Rate applied to the token portion when the bonus triggers.
    pub point_bonus_rate: DiscountRate,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            tier_discounts: [
                DiscountRate(100),
                DiscountRate(95),
                DiscountRate(90),
                DiscountRate(85),
            ],
            point_bonus_threshold: 100,
            point_bonus_rate: DiscountRate(90),
        }
    }
}

impl PricingPolicy {
    /// The rate a tier pays on token purchases when no activity applies.
    #[inline]
    pub fn default_discount(&self, tier: MemberTier) -> DiscountRate {
        self.tier_discounts[tier.level() as usize]
    }

    /// Splits a product price into points and tokens.
    ///
    /// ## Rule
    /// ```text
    /// points = price × (100 - discount) / 100
    /// tokens = price - points
    /// if tier is VIP and points > threshold:
    ///     tokens = tokens × bonus_rate / 100
    /// ```
    pub fn split_product_price(
        &self,
        price: u64,
        discount: PointDiscount,
        tier: MemberTier,
    ) -> ProductSplit {
        let points = discount.points_for(price);
        let remainder = price - points;

        let tokens = if tier.is_vip() && points > self.point_bonus_threshold {
            self.point_bonus_rate.apply(remainder)
        } else {
            remainder
        };

        ProductSplit { points, tokens }
    }
}

/// Cheapest charge for `quantity` tokens among the given activities.
///
/// Returns `None` when the iterator is empty. Equal prices are
/// interchangeable, so ties resolve to whichever comes first.
pub fn best_activity_charge<'a, I>(quantity: u64, activities: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a TokenPurchaseActivity>,
{
    activities
        .into_iter()
        .map(|activity| activity.discount.apply(quantity))
        .min()
}

// =============================================================================
// Unit Tests
// =============================================================================
