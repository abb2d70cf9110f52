//! # StoreSim Configuration
//!
//! Configuration for the demo binary: the checkout policy handed to the
//! store, and the log filter.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STORESIM_LOOKUP=first_entry_only                                   │
//! │     STORESIM_SURCHARGE_MODE=flat                                       │
//! │     STORESIM_SURCHARGE_BPS=700                                         │
//! │     STORESIM_LOG=debug                                                 │
//! │                                                                         │
//! │  2. TOML Config File (--config <path>)                                 │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     full_scan lookup, compounding 7% surcharge                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [checkout]
//! lookup = "full_scan"           # full_scan | first_entry_only
//! surcharge_mode = "compounding" # compounding | flat
//! surcharge_bps = 700
//!
//! [logging]
//! filter = "info,storesim=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use storesim_core::{
    CheckoutPolicy, LookupStrategy, SurchargeMode, SurchargeRate, DEFAULT_SURCHARGE_BPS,
    MAX_SURCHARGE_BPS,
};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

// =============================================================================
// Checkout Settings
// =============================================================================

/// How the store resolves ids and prices a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    #[serde(default)]
    pub lookup: LookupStrategy,

    #[serde(default)]
    pub surcharge_mode: SurchargeMode,

    /// Surcharge for non-premium members in basis points (700 = 7%).
    #[serde(default = "default_surcharge_bps")]
    pub surcharge_bps: u32,
}

fn default_surcharge_bps() -> u32 {
    DEFAULT_SURCHARGE_BPS
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            lookup: LookupStrategy::default(),
            surcharge_mode: SurchargeMode::default(),
            surcharge_bps: default_surcharge_bps(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,storesim=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete binary configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSimConfig {
    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl StoreSimConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file, if given and present
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let mut config = match config_path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                warn!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.checkout.surcharge_bps > MAX_SURCHARGE_BPS {
            return Err(AppError::InvalidConfig(format!(
                "surcharge_bps must be between 0 and {}, got {}",
                MAX_SURCHARGE_BPS, self.checkout.surcharge_bps
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides read through `var`, normally the process
    /// environment. Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(lookup) = var("STORESIM_LOOKUP") {
            match lookup.parse() {
                Ok(parsed) => {
                    debug!(%lookup, "Overriding lookup strategy from environment");
                    self.checkout.lookup = parsed;
                }
                Err(e) => warn!("Ignoring STORESIM_LOOKUP: {}", e),
            }
        }

        if let Some(mode) = var("STORESIM_SURCHARGE_MODE") {
            match mode.parse() {
                Ok(parsed) => {
                    debug!(%mode, "Overriding surcharge mode from environment");
                    self.checkout.surcharge_mode = parsed;
                }
                Err(e) => warn!("Ignoring STORESIM_SURCHARGE_MODE: {}", e),
            }
        }

        if let Some(bps) = var("STORESIM_SURCHARGE_BPS") {
            match bps.trim().parse::<u32>() {
                Ok(parsed) => self.checkout.surcharge_bps = parsed,
                Err(_) => warn!(%bps, "Ignoring STORESIM_SURCHARGE_BPS: not a number"),
            }
        }

        if let Some(filter) = var("STORESIM_LOG") {
            self.logging.filter = filter;
        }
    }

    /// The policy to build the store with.
    pub fn checkout_policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            lookup: self.checkout.lookup,
            surcharge_mode: self.checkout.surcharge_mode,
            surcharge_rate: SurchargeRate::from_bps(self.checkout.surcharge_bps),
        }
    }
}
