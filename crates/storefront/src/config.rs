//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFRONT_API_PATH` - Tenant path segment selecting the store on the hosted API
//!
//! ## Optional
//! - `SHOPFRONT_API_BASE_URL` - Hosted API base URL (default: `https://vue3-course-api.hexschool.io/v2`)
//! - `SHOPFRONT_LOCALE_SOURCE` - Validation message catalog, a path or http(s) URL (default: `./zh_TW.json`)
//! - `SHOPFRONT_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default hosted API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://vue3-course-api.hexschool.io/v2";

/// Default locale catalog location, relative to the working directory.
pub const DEFAULT_LOCALE_SOURCE: &str = "./zh_TW.json";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct ShopfrontConfig {
    /// Hosted API connection settings
    pub api: ApiConfig,
    /// Where the validation message catalog is loaded from
    pub locale_source: LocaleSource,
}

/// Hosted API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://vue3-course-api.hexschool.io/v2`
    pub base_url: Url,
    /// Tenant path segment
    pub api_path: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a config with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant segment is empty or contains a slash.
    pub fn new(base_url: Url, api_path: impl Into<String>) -> Result<Self, ConfigError> {
        let api_path = api_path.into();
        validate_api_path(&api_path)?;
        Ok(Self {
            base_url,
            api_path,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Root of the tenant's endpoints: `{base}/api/{tenant}`.
    #[must_use]
    pub fn api_root(&self) -> String {
        format!(
            "{}/api/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.api_path
        )
    }
}

/// Location of a locale catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleSource {
    /// A file on disk.
    Path(PathBuf),
    /// A document fetched over HTTP.
    Url(Url),
}

impl std::str::FromStr for LocaleSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Url::parse(s).map(Self::Url).map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_LOCALE_SOURCE".to_string(), e.to_string())
            })
        } else if s.trim().is_empty() {
            Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_LOCALE_SOURCE".to_string(),
                "must not be empty".to_string(),
            ))
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for LocaleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

impl ShopfrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("SHOPFRONT_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPFRONT_API_BASE_URL".to_string(), e.to_string())
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_API_BASE_URL".to_string(),
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        let api_path = lookup("SHOPFRONT_API_PATH")
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOPFRONT_API_PATH".to_string()))?;

        let timeout_secs = lookup("SHOPFRONT_HTTP_TIMEOUT_SECS")
            .map_or(Ok(DEFAULT_TIMEOUT_SECS), |v| v.parse::<u64>())
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let locale_source = lookup("SHOPFRONT_LOCALE_SOURCE")
            .unwrap_or_else(|| DEFAULT_LOCALE_SOURCE.to_string())
            .parse()?;

        let mut api = ApiConfig::new(base_url, api_path)?;
        api.timeout = Duration::from_secs(timeout_secs);

        Ok(Self { api, locale_source })
    }
}

/// The tenant segment is interpolated into every URL.
fn validate_api_path(api_path: &str) -> Result<(), ConfigError> {
    if api_path.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPFRONT_API_PATH".to_string(),
            "must not be empty".to_string(),
        ));
    }
    if api_path.contains(['/', '?', '#']) || api_path.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPFRONT_API_PATH".to_string(),
            "must be a single path segment".to_string(),
        ));
    }
    Ok(())
}
