//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CATALOG_API_URL` - Base URL of the product/stock API (default: `http://localhost:3333`)
//! - `CATALOG_API_TOKEN` - Bearer token sent to the catalog API
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout (default: none, wait indefinitely)
//! - `CATALOG_PRODUCT_CACHE_TTL_SECS` - Product cache TTL, 0 disables (default: 0)
//! - `CATALOG_PRODUCT_CACHE_CAPACITY` - Maximum cached products (default: 1000)
//! - `CART_STORAGE_PATH` - File backing the durable store (default: `rocketshoes-storage.json`)
//! - `CART_STORAGE_KEY` - Key the serialized cart lives under (default: `@RocketShoes:cart`)
//! - `LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Key the serialized cart is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_CATALOG_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_PATH: &str = "rocketshoes-storage.json";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: u64 = 0;
const DEFAULT_PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Catalog/stock API configuration
    pub catalog: CatalogConfig,
    /// Durable store configuration
    pub storage: StorageConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Catalog/stock API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL, always ending in `/` so endpoints can be joined onto it
    pub base_url: Url,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// How long product metadata stays cached; zero disables the cache
    pub product_cache_ttl: Duration,
    /// Maximum number of cached products
    pub product_cache_capacity: u64,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("product_cache_ttl", &self.product_cache_ttl)
            .field("product_cache_capacity", &self.product_cache_capacity)
            .finish()
    }
}

/// Durable store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// File backing the store
    pub path: PathBuf,
    /// Key the serialized cart lives under
    pub key: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog = CatalogConfig::from_lookup(&lookup)?;
        let storage = StorageConfig {
            path: PathBuf::from(get_or_default(&lookup, "CART_STORAGE_PATH", DEFAULT_STORAGE_PATH)),
            key: get_or_default(&lookup, "CART_STORAGE_KEY", DEFAULT_STORAGE_KEY),
        };
        let log_format = get_optional(&lookup, "LOG_FORMAT")
            .map(|value| {
                value
                    .parse::<LogFormat>()
                    .map_err(|e| ConfigError::InvalidEnvVar("LOG_FORMAT".to_string(), e))
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            catalog,
            storage,
            log_format,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
        })
    }
}

impl CatalogConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = get_or_default(lookup, "CATALOG_API_URL", DEFAULT_CATALOG_URL);
        let base_url = parse_base_url(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e))?;

        let timeout = get_optional(lookup, "CATALOG_TIMEOUT_SECS")
            .map(|value| parse_number::<u64>("CATALOG_TIMEOUT_SECS", &value))
            .transpose()?
            .map(Duration::from_secs);

        let ttl_secs = get_optional(lookup, "CATALOG_PRODUCT_CACHE_TTL_SECS")
            .map(|value| parse_number::<u64>("CATALOG_PRODUCT_CACHE_TTL_SECS", &value))
            .transpose()?
            .unwrap_or(DEFAULT_PRODUCT_CACHE_TTL_SECS);

        let product_cache_capacity = get_optional(lookup, "CATALOG_PRODUCT_CACHE_CAPACITY")
            .map(|value| parse_number::<u64>("CATALOG_PRODUCT_CACHE_CAPACITY", &value))
            .transpose()?
            .unwrap_or(DEFAULT_PRODUCT_CACHE_CAPACITY);

        Ok(Self {
            base_url,
            api_token: get_optional(lookup, "CATALOG_API_TOKEN").map(SecretString::from),
            timeout,
            product_cache_ttl: Duration::from_secs(ttl_secs),
            product_cache_capacity,
        })
    }

    /// Configuration for `base_url` with defaults everywhere else.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e))?;

        Ok(Self {
            base_url,
            api_token: None,
            timeout: None,
            product_cache_ttl: Duration::from_secs(DEFAULT_PRODUCT_CACHE_TTL_SECS),
            product_cache_capacity: DEFAULT_PRODUCT_CACHE_CAPACITY,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an http(s) base URL and make sure its path ends in `/`.
///
/// `Url::join` replaces the last path segment unless it ends in a slash, so
/// `http://host/api` must become `http://host/api/` before joining `stock/1`.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:3333/");
        assert!(config.catalog.api_token.is_none());
        assert!(config.catalog.timeout.is_none());
        assert!(config.catalog.product_cache_ttl.is_zero());
        assert_eq!(config.catalog.product_cache_capacity, 1000);
        assert_eq!(config.storage.path, PathBuf::from("rocketshoes-storage.json"));
        assert_eq!(config.storage.key, "@RocketShoes:cart");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CATALOG_API_URL", "https://api.example.test/v1"),
            ("CATALOG_API_TOKEN", "tok_9f8e7d"),
            ("CATALOG_TIMEOUT_SECS", "5"),
            ("CATALOG_PRODUCT_CACHE_TTL_SECS", "120"),
            ("CART_STORAGE_PATH", "/tmp/cart.json"),
            ("CART_STORAGE_KEY", "cart"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.catalog.base_url.as_str(), "https://api.example.test/v1/");
        assert_eq!(
            config.catalog.api_token.as_ref().unwrap().expose_secret(),
            "tok_9f8e7d"
        );
        assert_eq!(config.catalog.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.catalog.product_cache_ttl, Duration::from_secs(120));
        assert_eq!(config.storage.path, PathBuf::from("/tmp/cart.json"));
        assert_eq!(config.storage.key, "cart");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = load(&[("CATALOG_API_URL", "  "), ("CART_STORAGE_KEY", "")]).unwrap();
        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:3333/");
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = load(&[("CATALOG_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_TIMEOUT_SECS")
        );

        let err = load(&[("CATALOG_API_URL", "ftp://files.example.test")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_API_URL"));

        let err = load(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "LOG_FORMAT"));
    }

    #[test]
    fn test_catalog_config_debug_redacts_token() {
        let mut config = CatalogConfig::with_base_url("http://localhost:3333").unwrap();
        config.api_token = Some(SecretString::from("super_secret_catalog_token"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("localhost:3333"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_catalog_token"));
    }
}
