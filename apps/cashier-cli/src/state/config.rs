//! # Cashier Configuration
//!
//! Pricing knobs and shell settings, loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CASHIER_TIER_DISCOUNTS=100,95,90,85                                │
//! │     CASHIER_POINT_BONUS_THRESHOLD=100                                  │
//! │     CASHIER_POINT_BONUS_RATE=90                                        │
//! │     CASHIER_LOG=debug                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/token-cashier/cashier.toml (Linux)                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cashier.toml
//! [pricing]
//! tier_discounts = [100, 95, 90, 85]  # Normal, VIP1, VIP2, VIP3
//! point_bonus_threshold = 100
//! point_bonus_rate = 90
//!
//! [app]
//! log_filter = "info,cashier=debug"
//! echo_commands = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use cashier_core::{DiscountRate, PricingPolicy};

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`CashierConfig`].
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Pricing Settings
// =============================================================================

/// The `[pricing]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Token purchase rate per tier, indexed by tier level (0..=3).
    #[serde(default = "default_tier_discounts")]
    pub tier_discounts: Vec<u8>,

    /// Points spent must exceed this for the VIP bonus to apply.
    #[serde(default = "default_point_bonus_threshold")]
    pub point_bonus_threshold: u64,

    /// Rate applied to the token remainder when the bonus applies.
    #[serde(default = "default_point_bonus_rate")]
    pub point_bonus_rate: u8,
}

fn default_tier_discounts() -> Vec<u8> {
    vec![100, 95, 90, 85]
}

fn default_point_bonus_threshold() -> u64 {
    100
}

fn default_point_bonus_rate() -> u8 {
    90
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tier_discounts: default_tier_discounts(),
            point_bonus_threshold: default_point_bonus_threshold(),
            point_bonus_rate: default_point_bonus_rate(),
        }
    }
}

// =============================================================================
// App Settings
// =============================================================================

/// The `[app]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Log every incoming command line at INFO.
    #[serde(default)]
    pub echo_commands: bool,
}

fn default_log_filter() -> String {
    "info,cashier=debug".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            log_filter: default_log_filter(),
            echo_commands: false,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashierConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub app: AppSettings,
}

impl CashierConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cashier.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading cashier config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Reads and parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Checks every value is in range.
    pub fn validate(&self) -> ConfigResult<()> {
        let tiers = &self.pricing.tier_discounts;
        if tiers.len() != 4 {
            return Err(ConfigError::Invalid(format!(
                "tier_discounts needs exactly 4 entries (Normal, VIP1, VIP2, VIP3), got {}",
                tiers.len()
            )));
        }

        for pct in tiers {
            DiscountRate::new(*pct)
                .map_err(|e| ConfigError::Invalid(format!("tier_discounts: {}", e)))?;
        }

        DiscountRate::new(self.pricing.point_bonus_rate)
            .map_err(|e| ConfigError::Invalid(format!("point_bonus_rate: {}", e)))?;

        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// production). Unparseable values are logged and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("CASHIER_TIER_DISCOUNTS") {
            let parsed: Result<Vec<u8>, _> =
                raw.split(',').map(|part| part.trim().parse::<u8>()).collect();
            match parsed {
                Ok(tiers) => {
                    debug!(?tiers, "Overriding tier discounts from environment");
                    self.pricing.tier_discounts = tiers;
                }
                Err(_) => warn!(value = %raw, "Ignoring malformed CASHIER_TIER_DISCOUNTS"),
            }
        }

        if let Some(raw) = lookup("CASHIER_POINT_BONUS_THRESHOLD") {
            match raw.trim().parse::<u64>() {
                Ok(threshold) => self.pricing.point_bonus_threshold = threshold,
                Err(_) => warn!(value = %raw, "Ignoring malformed CASHIER_POINT_BONUS_THRESHOLD"),
            }
        }

        if let Some(raw) = lookup("CASHIER_POINT_BONUS_RATE") {
            match raw.trim().parse::<u8>() {
                Ok(rate) => self.pricing.point_bonus_rate = rate,
                Err(_) => warn!(value = %raw, "Ignoring malformed CASHIER_POINT_BONUS_RATE"),
            }
        }

        if let Some(filter) = lookup("CASHIER_LOG") {
            self.app.log_filter = filter;
        }
    }

    /// Builds the engine's pricing policy. Fails on values `validate` rejects.
    pub fn policy(&self) -> ConfigResult<PricingPolicy> {
        self.validate()?;

        let rate = |pct: u8| {
            DiscountRate::new(pct).map_err(|e| ConfigError::Invalid(e.to_string()))
        };
        let tiers = &self.pricing.tier_discounts;

        Ok(PricingPolicy {
            tier_discounts: [rate(tiers[0])?, rate(tiers[1])?, rate(tiers[2])?, rate(tiers[3])?],
            point_bonus_threshold: self.pricing.point_bonus_threshold,
            point_bonus_rate: rate(self.pricing.point_bonus_rate)?,
        })
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "token-cashier", "cashier")
            .map(|dirs| dirs.config_dir().join("cashier.toml"))
    }
}
