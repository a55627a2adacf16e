//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MOBISTORE_DATA_DIR` - Directory for file-backed storage (default: .mobistore)
//! - `MOBISTORE_CART_KEY` - Storage key for the cart record (default: mobistore:cart)
//! - `MOBISTORE_CURRENCY` - ISO 4217 currency for totals (default: USD)
//! - `MOBISTORE_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use std::path::PathBuf;
use std::str::FromStr;

use mobistore_core::CurrencyCode;
use thiserror::Error;

use crate::cart::DEFAULT_CART_KEY;
use crate::storage::validate_key;

const DEFAULT_DATA_DIR: &str = ".mobistore";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Root directory for [`FileStorage`](crate::storage::FileStorage)
    pub data_dir: PathBuf,
    /// Key the cart record is stored under
    pub cart_key: String,
    /// Currency used for summaries and checkout payloads
    pub currency: CurrencyCode,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cart_key: DEFAULT_CART_KEY.to_string(),
            currency: CurrencyCode::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(get_or_default(&lookup, "MOBISTORE_DATA_DIR", DEFAULT_DATA_DIR));

        let cart_key = get_or_default(&lookup, "MOBISTORE_CART_KEY", DEFAULT_CART_KEY);
        validate_key(&cart_key).map_err(|e| {
            ConfigError::InvalidEnvVar("MOBISTORE_CART_KEY".to_string(), e.to_string())
        })?;

        let currency = get_or_default(&lookup, "MOBISTORE_CURRENCY", CurrencyCode::default().code())
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MOBISTORE_CURRENCY".to_string(), e.to_string())
            })?;

        let log_format = get_or_default(&lookup, "MOBISTORE_LOG_FORMAT", "pretty")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("MOBISTORE_LOG_FORMAT".to_string(), e))?;

        Ok(Self {
            data_dir,
            cart_key,
            currency,
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value. Blank values count as unset.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.cart_key, "mobistore:cart");
        assert_eq!(config.data_dir, PathBuf::from(".mobistore"));
        assert_eq!(config.currency, CurrencyCode::USD);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("MOBISTORE_DATA_DIR", "/var/lib/mobistore"),
            ("MOBISTORE_CART_KEY", "shop:cart"),
            ("MOBISTORE_CURRENCY", "gbp"),
            ("MOBISTORE_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/mobistore"));
        assert_eq!(config.cart_key, "shop:cart");
        assert_eq!(config.currency, CurrencyCode::GBP);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("MOBISTORE_CART_KEY", "  ")]).unwrap();
        assert_eq!(config.cart_key, DEFAULT_CART_KEY);
    }

    #[test]
    fn test_invalid_cart_key() {
        let err = load(&[("MOBISTORE_CART_KEY", "../cart")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref var, _) if var == "MOBISTORE_CART_KEY"));
    }

    #[test]
    fn test_invalid_currency() {
        let err = load(&[("MOBISTORE_CURRENCY", "DOGE")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref var, _) if var == "MOBISTORE_CURRENCY"));
    }

    #[test]
    fn test_invalid_log_format() {
        let err = load(&[("MOBISTORE_LOG_FORMAT", "xml")]).unwrap_err();
        assert!(err.to_string().contains("MOBISTORE_LOG_FORMAT"));
    }
}
