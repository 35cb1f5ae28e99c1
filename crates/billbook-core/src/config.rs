//! # Billing Configuration
//!
//! Settings the embedding application hands to the engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BILLBOOK_DEFAULT_GST_RATE=18                                       │
//! │     BILLBOOK_CURRENCY_SYMBOL=₹                                         │
//! │     BILLBOOK_MAX_LINE_ITEMS=500                                        │
//! │                                                                         │
//! │  2. TOML Config File (billbook.toml)                                   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     18% GST, ₹, 500 lines per bill                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # billbook.toml
//! default_gst_rate = 18      # percent, up to two decimals (2.5 is fine)
//! currency_symbol = "₹"
//! max_line_items = 500
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::types::TaxRate;

pub const ENV_DEFAULT_GST_RATE: &str = "BILLBOOK_DEFAULT_GST_RATE";
pub const ENV_CURRENCY_SYMBOL: &str = "BILLBOOK_CURRENCY_SYMBOL";
pub const ENV_MAX_LINE_ITEMS: &str = "BILLBOOK_MAX_LINE_ITEMS";

// =============================================================================
// Billing Config
// =============================================================================

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    /// GST rate a new bill draft starts with.
    /// Written as a percentage like every stored rate: `18`, `2.5` or `"2.5"`.
    #[serde(default = "default_gst_rate")]
    pub default_gst_rate: TaxRate,

    /// Prefix used by [`crate::money::Money::format_with`] in summaries.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Upper bound on line items per bill.
    #[serde(default = "default_max_line_items")]
    pub max_line_items: usize,
}

fn default_gst_rate() -> TaxRate {
    TaxRate::from_percent(18)
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_max_line_items() -> usize {
    crate::DEFAULT_MAX_LINE_ITEMS
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            default_gst_rate: default_gst_rate(),
            currency_symbol: default_currency_symbol(),
            max_line_items: default_max_line_items(),
        }
    }
}

impl BillingConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = BillingConfig::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: BillingConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML file, then applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading billing config");

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut config = Self::from_toml_str(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a key lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_DEFAULT_GST_RATE) {
            self.default_gst_rate = raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue(ENV_DEFAULT_GST_RATE.to_string()))?;
            debug!(rate = %self.default_gst_rate, "Default GST rate overridden");
        }

        if let Some(raw) = lookup(ENV_CURRENCY_SYMBOL) {
            self.currency_symbol = raw;
        }

        if let Some(raw) = lookup(ENV_MAX_LINE_ITEMS) {
            self.max_line_items = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(ENV_MAX_LINE_ITEMS.to_string()))?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_gst_rate.is_negative() {
            return Err(ConfigError::InvalidValue("default_gst_rate".to_string()));
        }
        if self.max_line_items == 0 {
            return Err(ConfigError::InvalidValue("max_line_items".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
