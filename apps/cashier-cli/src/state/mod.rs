//! # State Module
//!
//! Everything a command needs, built once at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  CashierConfig ──► policy() ──► Store::with_policy ──► Store::cashier  │
//! │                    (tier table + bonus rule, one copy for both)        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  CashierState                                                    │  │
//! │  │    cashier: Cashier      ◄── every command goes through this     │  │
//! │  │    config:  CashierConfig ◄── read-only after startup            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY: the engine and stores synchronize internally, so the   │
//! │  state can be shared behind an Arc without an outer lock.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::{AppSettings, CashierConfig, ConfigError, ConfigResult, PricingSettings};

use cashier_core::Cashier;
use cashier_store::Store;

/// The engine plus the configuration it was built from.
#[derive(Debug)]
pub struct CashierState {
    pub cashier: Cashier,
    pub config: CashierConfig,
}

impl CashierState {
    /// Builds fresh, empty stores and an engine from a validated config.
    pub fn new(config: CashierConfig) -> ConfigResult<Self> {
        let policy = config.policy()?;
        let cashier = Store::with_policy(&policy).cashier();
        Ok(CashierState { cashier, config })
    }
}

impl Default for CashierState {
    fn default() -> Self {
        CashierState {
            cashier: Store::new().cashier(),
            config: CashierConfig::default(),
        }
    }
}
