//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOPKEEP_DATA_DIR` - Directory holding the shop collections (default: `./data`)
//! - `SHOPKEEP_SESSION_DIR` - Directory holding the buyer's cart (default: `<data dir>/session`)
//! - `SHOPKEEP_VIACEP_URL` - Base URL of the postal-code service (default: `https://viacep.com.br/ws`)
//! - `SHOPKEEP_LOOKUP_TIMEOUT_SECS` - Timeout for a single address lookup (default: none)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default directory for shop data.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default postal-code lookup endpoint.
pub const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br/ws";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory for products, coupons, orders and stock
    pub data_dir: PathBuf,
    /// Directory for session-scoped state (the cart)
    pub session_dir: PathBuf,
    /// Address lookup service
    pub lookup: LookupConfig,
}

/// Postal-code lookup service configuration.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Base URL; the zip code and `/json/` are appended per request
    pub base_url: Url,
    /// Per-request timeout. `None` waits as long as the HTTP client allows.
    pub timeout: Option<Duration>,
}


impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(
            non_blank(var("SHOPKEEP_DATA_DIR")).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );
        let session_dir = non_blank(var("SHOPKEEP_SESSION_DIR"))
            .map_or_else(|| data_dir.join("session"), PathBuf::from);

        let lookup = LookupConfig::from_vars(&var)?;

        Ok(Self {
            data_dir,
            session_dir,
            lookup,
        })
    }

    /// Configuration rooted at `data_dir`, with every other setting defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the default lookup URL does not parse.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = data_dir.into();
        Ok(Self {
            session_dir: data_dir.join("session"),
            data_dir,
            lookup: LookupConfig::viacep()?,
        })
    }
}

impl LookupConfig {
    /// The public `ViaCEP` service with no timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if [`DEFAULT_VIACEP_URL`] does not parse.
    pub fn viacep() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(DEFAULT_VIACEP_URL)?,
            timeout: None,
        })
    }

    fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = non_blank(var("SHOPKEEP_VIACEP_URL"))
            .unwrap_or_else(|| DEFAULT_VIACEP_URL.to_string());
        let base_url = parse_base_url(&raw_url)?;

        let timeout = non_blank(var("SHOPKEEP_LOOKUP_TIMEOUT_SECS"))
            .map(|secs| {
                secs.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "SHOPKEEP_LOOKUP_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self { base_url, timeout })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Treat a blank variable the same as an unset one.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse the lookup base URL, accepting only http(s).
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("SHOPKEEP_VIACEP_URL".to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
