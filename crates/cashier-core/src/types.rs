//! # Domain Types
//!
//! Core domain types used throughout Token Cashier.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │      User       │   │    Product      │   │ TokenPurchaseActivity│  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  id (u64)       │   │  id (u64)       │   │  id, tier            │  │
//! │  │  name           │   │  name           │   │  discount (1-100)    │  │
//! │  │  tier           │   │  price (tokens) │   │  period [start, end) │  │
//! │  │  account        │   └─────────────────┘   └──────────────────────┘  │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │   MemberTier    │   │     Period      │   │ProductPurchaseActivity│ │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  Normal         │   │  start (incl.)  │   │  id                  │  │
//! │  │  Vip1..Vip3     │   │  end   (excl.)  │   │  point discount 0-100│  │
//! │  └─────────────────┘   └─────────────────┘   │  period [start, end) │  │
//! │                                              └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by a `u64` assigned by its store, starting at 1.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{Account, Balance};
use crate::error::ValidationError;
use crate::pricing::{DiscountRate, PointDiscount};

/// Identifier of a registered user.
pub type UserId = u64;

/// Identifier of a product.
pub type ProductId = u64;

/// Identifier of an activity (unique within its kind).
pub type ActivityId = u64;

// =============================================================================
// Member Tier
// =============================================================================

/// Member level controlling the default token-purchase discount.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MemberTier {
    #[default]
    Normal,
    Vip1,
    Vip2,
    Vip3,
}

impl MemberTier {
    /// All tiers in ascending order.
    pub const ALL: [MemberTier; 4] = [
        MemberTier::Normal,
        MemberTier::Vip1,
        MemberTier::Vip2,
        MemberTier::Vip3,
    ];

    /// Returns the ordinal level (0 = Normal, 3 = VIP3).
    #[inline]
    pub const fn level(&self) -> u8 {
        match self {
            MemberTier::Normal => 0,
            MemberTier::Vip1 => 1,
            MemberTier::Vip2 => 2,
            MemberTier::Vip3 => 3,
        }
    }

    /// Returns true for any VIP level.
    #[inline]
    pub const fn is_vip(&self) -> bool {
        !matches!(self, MemberTier::Normal)
    }
}

impl TryFrom<u8> for MemberTier {
    type Error = ValidationError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(MemberTier::Normal),
            1 => Ok(MemberTier::Vip1),
            2 => Ok(MemberTier::Vip2),
            3 => Ok(MemberTier::Vip3),
            _ => Err(ValidationError::OutOfRange {
                field: "tier".to_string(),
                min: 0,
                max: 3,
            }),
        }
    }
}

impl std::fmt::Display for MemberTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberTier::Normal => write!(f, "normal"),
            MemberTier::Vip1 => write!(f, "vip1"),
            MemberTier::Vip2 => write!(f, "vip2"),
            MemberTier::Vip3 => write!(f, "vip3"),
        }
    }
}

impl std::str::FromStr for MemberTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "0" => Ok(MemberTier::Normal),
            "vip1" | "1" => Ok(MemberTier::Vip1),
            "vip2" | "2" => Ok(MemberTier::Vip2),
            "vip3" | "3" => Ok(MemberTier::Vip3),
            _ => Err(ValidationError::OutOfRange {
                field: "tier".to_string(),
                min: 0,
                max: 3,
            }),
        }
    }
}

// =============================================================================
// Period
// =============================================================================

/// A validity window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Period { start, end }
    }

    /// `start` is inside, `end` is not. An inverted window contains nothing.
    #[inline]
    pub fn contains(&self, moment: DateTime<Utc>) -> bool {
        self.start <= moment && moment < self.end
    }
}

/// Anything that carries a validity window.
pub trait HasPeriod {
    fn period(&self) -> &Period;
}

/// Returns true when `moment` falls inside the record's validity window.
pub fn is_within_period<R: HasPeriod + ?Sized>(record: &R, moment: DateTime<Utc>) -> bool {
    record.period().contains(moment)
}

// =============================================================================
// User
// =============================================================================

/// A registered member.
///
/// The account is shared (`Arc`) so the store hands out cheap clones that all
/// mutate the same balances under the account's lock.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub tier: MemberTier,
    /// Percentage charged on token purchases when no activity applies.
    pub default_discount: DiscountRate,
    pub account: Arc<Account>,
}

/// A user's data before the store assigns an ID.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub tier: MemberTier,
    pub default_discount: DiscountRate,
}

/// Read-only view of a user, safe to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: UserId,
    pub name: String,
    pub tier: MemberTier,
    pub default_discount: DiscountRate,
    pub balance: Balance,
}

impl User {
    /// Captures the current state, reading both balances under one lock.
    pub fn snapshot(&self) -> Result<UserSnapshot, crate::error::StoreError> {
        Ok(UserSnapshot {
            id: self.id,
            name: self.name.clone(),
            tier: self.tier,
            default_discount: self.default_discount,
            balance: self.account.balance()?,
        })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A purchasable product, priced in tokens. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
}

/// A product before the store assigns an ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: u64,
}

// =============================================================================
// Activities
// =============================================================================

/// A promotion discounting token purchases for one member tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPurchaseActivity {
    pub id: ActivityId,
    pub tier: MemberTier,
    pub discount: DiscountRate,
    pub period: Period,
}

/// A token purchase activity before the store assigns an ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTokenPurchaseActivity {
    pub tier: MemberTier,
    pub discount: DiscountRate,
    pub period: Period,
}

/// A promotion letting points cover part of a product's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPurchaseActivity {
    pub id: ActivityId,
    pub discount: PointDiscount,
    pub period: Period,
}

/// A product purchase activity before the store assigns an ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductPurchaseActivity {
    pub discount: PointDiscount,
    pub period: Period,
}

impl HasPeriod for TokenPurchaseActivity {
    fn period(&self) -> &Period {
        &self.period
    }
}

impl HasPeriod for ProductPurchaseActivity {
    fn period(&self) -> &Period {
        &self.period
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
