//! Storefront API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use storefront_core::{QuantityUpdatePolicy, TaxRate, DEFAULT_TAX_RATE_BPS};

/// Where cart lines are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Process memory; the cart is lost on restart.
    #[default]
    Memory,
    /// SQLite through storefront-db.
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "sqlite" => Ok(StoreBackend::Sqlite),
            _ => Err(()),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Storefront API configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// Cart store backend
    pub store: StoreBackend,

    /// SQLite path, used when `store` is `Sqlite`
    pub db_path: PathBuf,

    /// Checkout tax rate
    pub tax_rate: TaxRate,

    /// How positive quantity edits are applied
    pub quantity_update: QuantityUpdatePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
            store: StoreBackend::Memory,
            db_path: PathBuf::from(":memory:"),
            tax_rate: TaxRate::from_bps(DEFAULT_TAX_RATE_BPS),
            quantity_update: QuantityUpdatePolicy::InPlace,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        Ok(AppConfig {
            host: lookup("HOST").unwrap_or(defaults.host),

            port: parse_or(&lookup, "PORT", defaults.port)?,

            store: parse_or(&lookup, "STOREFRONT_STORE", defaults.store)?,

            db_path: lookup("STOREFRONT_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),

            tax_rate: parse_or(&lookup, "STOREFRONT_TAX_RATE_BPS", DEFAULT_TAX_RATE_BPS)
                .map(TaxRate::from_bps)?,

            quantity_update: parse_or(&lookup, "STOREFRONT_QUANTITY_UPDATE", defaults.quantity_update)?,
        })
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
