//! Client configuration

use std::time::Duration;

use clap::Args;
use tani::catalog::DEFAULT_PER_PAGE;
use thiserror::Error;
use url::Url;

/// Default search debounce window, in milliseconds.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 550;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Storefront client configuration
#[derive(Debug, Args)]
pub struct ClientConfig {
    /// Storefront API base URL, e.g. `https://toko.example/api`
    #[arg(long, env = "TANI_API_URL")]
    pub api_url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "TANI_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Delay before a search keystroke triggers a request, in milliseconds
    #[arg(long, env = "TANI_SEARCH_DEBOUNCE_MS", default_value_t = DEFAULT_SEARCH_DEBOUNCE_MS)]
    pub search_debounce_ms: u64,

    /// Catalog page size
    #[arg(long, env = "TANI_PER_PAGE", default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,

    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Validated API connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is malformed or not http(s).
    pub fn api(&self) -> Result<ApiConfig, ConfigError> {
        ApiConfig::new(&self.api_url, self.api_token.clone())
    }

    /// Search debounce window
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Errors raised while validating configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid api url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported api url scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),

    #[error("api url cannot be used as a base")]
    CannotBeABase,
}

/// Where and how to reach the storefront backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL that endpoint paths are appended to
    pub base_url: Url,

    /// Optional bearer token
    pub token: Option<String>,
}

impl ApiConfig {
    /// Validate a base URL and token.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is malformed or not http(s).
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url.trim())?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_string()));
        }

        if base_url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeABase);
        }

        Ok(Self {
            base_url,
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }
}
