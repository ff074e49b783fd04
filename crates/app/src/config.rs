//! Configuration
//!
//! Argument groups read from the command line with environment fallbacks.
//! `.env` is loaded by the binary before parsing.

use std::time::Duration;

use clap::Args;
use petshop::inventory::InventoryDefaults;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("store url must start with http:// or https://, got {0}")]
    InvalidStoreUrl(String),

    #[error("settle poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("minimum stock {minimum} is above maximum stock {maximum}")]
    StockBounds { minimum: i64, maximum: i64 },
}

/// Hosted store connection.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Store base URL, e.g. `https://project.supabase.co`
    #[arg(long, env = "SUPABASE_URL")]
    pub store_url: String,

    /// Anonymous API key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub store_anon_key: String,

    /// Request timeout in seconds
    #[arg(long, env = "STORE_TIMEOUT_SECONDS", default_value_t = 10)]
    pub store_timeout_seconds: u64,
}

impl StoreConfig {
    /// Base URL without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStoreUrl`] when the scheme is missing.
    pub fn base_url(&self) -> Result<&str, ConfigError> {
        let url = self.store_url.trim().trim_end_matches('/');

        if url.starts_with("https://") || url.starts_with("http://") {
            Ok(url)
        } else {
            Err(ConfigError::InvalidStoreUrl(self.store_url.clone()))
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_seconds)
    }
}

/// Sale completion and inventory defaults.
#[derive(Debug, Clone, Args)]
pub struct SaleConfig {
    /// Shop name printed on receipts
    #[arg(long, env = "SHOP_NAME", default_value = "Petshop")]
    pub shop_name: String,

    /// How long to wait for the store's stock decrement after completing a sale
    #[arg(long, env = "SETTLE_TIMEOUT_MS", default_value_t = 1_500)]
    pub settle_timeout_ms: u64,

    /// How often to re-read stock while waiting
    #[arg(long, env = "SETTLE_POLL_MS", default_value_t = 250)]
    pub settle_poll_ms: u64,

    /// Opening stock for records created by a sync
    #[arg(long, env = "STARTING_STOCK", default_value_t = 100)]
    pub starting_stock: i64,

    /// Low-stock threshold for records created by a sync
    #[arg(long, env = "MINIMUM_STOCK", default_value_t = 10)]
    pub minimum_stock: i64,

    /// Shelf capacity for records created by a sync
    #[arg(long, env = "MAXIMUM_STOCK", default_value_t = 200)]
    pub maximum_stock: i64,
}

impl Default for SaleConfig {
    fn default() -> Self {
        let defaults = InventoryDefaults::default();

        Self {
            shop_name: "Petshop".to_string(),
            settle_timeout_ms: 1_500,
            settle_poll_ms: 250,
            starting_stock: defaults.starting_stock,
            minimum_stock: defaults.minimum_stock,
            maximum_stock: defaults.maximum_stock,
        }
    }
}

/// Bounded wait for an asynchronous store side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleWindow {
    pub timeout: Duration,
    pub poll: Duration,
}

impl SaleConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPollInterval`] for a zero poll interval.
    pub fn settle_window(&self) -> Result<SettleWindow, ConfigError> {
        if self.settle_poll_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        Ok(SettleWindow {
            timeout: Duration::from_millis(self.settle_timeout_ms),
            poll: Duration::from_millis(self.settle_poll_ms),
        })
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::StockBounds`] when the minimum exceeds the maximum.
    pub fn inventory_defaults(&self) -> Result<InventoryDefaults, ConfigError> {
        if self.minimum_stock > self.maximum_stock {
            return Err(ConfigError::StockBounds {
                minimum: self.minimum_stock,
                maximum: self.maximum_stock,
            });
        }

        Ok(InventoryDefaults {
            starting_stock: self.starting_stock,
            minimum_stock: self.minimum_stock,
            maximum_stock: self.maximum_stock,
        })
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Staff session settings.
#[derive(Debug, Clone, Args)]
pub struct SessionConfig {
    /// Shared staff password
    #[arg(long, env = "STAFF_PASSWORD", hide_env_values = true)]
    pub staff_password: String,
}

impl SessionConfig {
    /// The password, wiped from memory when dropped.
    pub fn password(&self) -> Zeroizing<String> {
        Zeroizing::new(self.staff_password.clone())
    }
}
