//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `HANDLEKURV_API_BASE_URL` - Catalog backend URL (default: `http://localhost:8000`)
//! - `HANDLEKURV_DATA_DIR` - Directory holding on-device data (default: `.handlekurv`)
//! - `HANDLEKURV_CACHE_TTL_SECS` - Product listing cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g., `production`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_DATA_DIR: &str = ".handlekurv";
const DEFAULT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Handlekurv application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the catalog backend
    pub api_base_url: Url,
    /// Directory for the on-device key-value store
    pub data_dir: PathBuf,
    /// How long product listings stay cached
    pub cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl AppConfig {
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

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let get_or_default =
            |key: &str, default: &str| get_optional(key).unwrap_or_else(|| default.to_string());

        let api_base_url = parse_base_url(
            "HANDLEKURV_API_BASE_URL",
            &get_or_default("HANDLEKURV_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let data_dir = PathBuf::from(get_or_default("HANDLEKURV_DATA_DIR", DEFAULT_DATA_DIR));
        let cache_ttl = get_or_default("HANDLEKURV_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("HANDLEKURV_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            data_dir,
            cache_ttl,
            sentry_dsn: get_optional("SENTRY_DSN"),
            sentry_environment: get_optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an HTTP(S) base URL.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    Ok(url)
}
