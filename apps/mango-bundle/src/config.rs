//! # Bundle Configuration
//!
//! Settings read once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MANGO_STORE_NAME, MANGO_CATALOG_PATH,                              │
//! │     MANGO_RECEIPT_LOG, MANGO_QUEUE_DEPTH                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     explicit path, else $MANGO_CONFIG                                  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     embedded catalog, no receipt log                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "Mango Mart"
//! currency_symbol = "$"
//! currency_decimals = 2
//! catalog_path = "catalog.json"       # optional, embedded data otherwise
//! receipt_log_path = "receipts.jsonl" # optional, memory only otherwise
//! dispatch_queue_depth = 64
//! ```
//!
//! Configuration is read-only after initialization, so no lock is needed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{BundleError, BundleResult};

/// Upper bound on display decimals; no ISO 4217 currency uses more than 4.
const MAX_CURRENCY_DECIMALS: u8 = 4;

/// Bundle configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Store name (printed on receipts).
    pub store_name: String,

    /// Currency symbol (for display).
    pub currency_symbol: String,

    /// Number of decimal places for currency.
    pub currency_decimals: u8,

    /// Catalog file to load instead of the embedded one.
    pub catalog_path: Option<PathBuf>,

    /// Append each receipt as a JSON line to this file.
    pub receipt_log_path: Option<PathBuf>,

    /// Capacity of the dispatcher's command channel.
    pub dispatch_queue_depth: usize,
}

impl Default for BundleConfig {
    fn default() -> Self {
        BundleConfig {
            store_name: "Mango Mart".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            catalog_path: None,
            receipt_log_path: None,
            dispatch_queue_depth: 64,
        }
    }
}

impl BundleConfig {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// With no explicit path, `MANGO_CONFIG` names the file. A named file
    /// that doesn't exist is an error; no file at all means defaults.
    pub fn load(config_path: Option<PathBuf>) -> BundleResult<Self> {
        let path = config_path.or_else(|| std::env::var_os("MANGO_CONFIG").map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> BundleResult<Self> {
        info!(?path, "Loading bundle config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BundleResult<()> {
        if self.dispatch_queue_depth == 0 {
            return Err(BundleError::InvalidConfig(
                "dispatch_queue_depth must be greater than 0".into(),
            ));
        }

        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(BundleError::InvalidConfig(format!(
                "currency_decimals must be at most {}, got {}",
                MAX_CURRENCY_DECIMALS, self.currency_decimals
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("MANGO_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(path) = std::env::var_os("MANGO_CATALOG_PATH") {
            debug!(?path, "Overriding catalog path from environment");
            self.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(path) = std::env::var_os("MANGO_RECEIPT_LOG") {
            debug!(?path, "Overriding receipt log path from environment");
            self.receipt_log_path = Some(PathBuf::from(path));
        }

        if let Ok(depth) = std::env::var("MANGO_QUEUE_DEPTH") {
            if let Ok(d) = depth.parse::<usize>() {
                self.dispatch_queue_depth = d;
            }
        }
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ```rust
    /// use mango_bundle::config::BundleConfig;
    ///
    /// let config = BundleConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        let config = BundleConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_format_currency_no_decimals() {
        let config = BundleConfig {
            currency_symbol: "¥".to_string(),
            currency_decimals: 0,
            ..BundleConfig::default()
        };
        assert_eq!(config.format_currency(1234), "¥1234");
    }

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config: BundleConfig = toml::from_str(
            r#"
            store_name = "Mango Mart Downtown"
            receipt_log_path = "/tmp/receipts.jsonl"
            "#,
        )
        .unwrap();

        assert_eq!(config.store_name, "Mango Mart Downtown");
        assert_eq!(
            config.receipt_log_path,
            Some(PathBuf::from("/tmp/receipts.jsonl"))
        );
        assert_eq!(config.currency_decimals, 2);
        assert_eq!(config.dispatch_queue_depth, 64);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(BundleConfig::default().validate().is_ok());

        let zero_queue = BundleConfig {
            dispatch_queue_depth: 0,
            ..BundleConfig::default()
        };
        assert!(matches!(
            zero_queue.validate(),
            Err(BundleError::InvalidConfig(_))
        ));

        let too_precise = BundleConfig {
            currency_decimals: 5,
            ..BundleConfig::default()
        };
        assert!(too_precise.validate().is_err());
    }

    #[test]
    fn test_load_env_overrides_file() {
        let path = std::env::temp_dir().join(format!("mango-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
            store_name = "From File"
            currency_symbol = "€"
            dispatch_queue_depth = 8
            "#,
        )
        .unwrap();

        std::env::set_var("MANGO_STORE_NAME", "From Env");
        std::env::set_var("MANGO_QUEUE_DEPTH", "16");
        std::env::set_var("MANGO_RECEIPT_LOG", "/tmp/mango-env-receipts.jsonl");
        let loaded = BundleConfig::load(Some(path.clone()));

        std::env::set_var("MANGO_QUEUE_DEPTH", "0");
        let zero_depth = BundleConfig::load(Some(path.clone()));

        std::env::remove_var("MANGO_STORE_NAME");
        std::env::remove_var("MANGO_QUEUE_DEPTH");
        std::env::remove_var("MANGO_RECEIPT_LOG");
        std::fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.store_name, "From Env");
        assert_eq!(config.dispatch_queue_depth, 16);
        assert_eq!(
            config.receipt_log_path,
            Some(PathBuf::from("/tmp/mango-env-receipts.jsonl"))
        );
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.currency_decimals, 2);

        assert!(matches!(zero_depth, Err(BundleError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = BundleConfig::from_file(Path::new("/definitely/not/here/mango.toml"));
        assert!(matches!(result, Err(BundleError::Io { .. })));
    }
}
