//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOODIO_BACKEND_URL` - Base URL of the Foodio REST backend (e.g. `http://localhost:3000`)
//!
//! ## Optional
//! - `FOODIO_HOST` - Bind address (default: 127.0.0.1)
//! - `FOODIO_PORT` - Listen port (default: 3001)
//! - `FOODIO_BASE_URL` - Public URL of this site (default: `http://{host}:{port}`)
//! - `FOODIO_BACKEND_TIMEOUT_SECS` - Per-request backend timeout (default: 10)
//! - `FOODIO_CURRENCY_SYMBOL` - Symbol prefixed to prices (default: ৳)
//! - `FOODIO_STATIC_DIR` - Directory served under `/static` (default: crates/web/static)
//! - `FOODIO_LOG_JSON` - Emit JSON logs when `true` or `1`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of this site
    pub base_url: String,
    /// REST backend connection settings
    pub backend: BackendConfig,
    /// Currency symbol prefixed to every displayed price
    pub currency_symbol: String,
    /// Directory of stylesheets and images served under `/static`
    pub static_dir: PathBuf,
    /// Whether logs are written as JSON lines
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Where the REST backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl WebConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`WebConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host: IpAddr = env.parse_or("FOODIO_HOST", "127.0.0.1")?;
        let port: u16 = env.parse_or("FOODIO_PORT", "3001")?;
        let base_url = env
            .optional("FOODIO_BASE_URL")
            .unwrap_or_else(|| format!("http://{host}:{port}"));

        let backend = BackendConfig {
            base_url: parse_backend_url(&env.required("FOODIO_BACKEND_URL")?)?,
            timeout: Duration::from_secs(env.parse_or("FOODIO_BACKEND_TIMEOUT_SECS", "10")?),
        };

        let log_json = env
            .optional("FOODIO_LOG_JSON")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"));

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            currency_symbol: env.or_default("FOODIO_CURRENCY_SYMBOL", "৳"),
            static_dir: PathBuf::from(env.or_default("FOODIO_STATIC_DIR", "crates/web/static")),
            log_json,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Get the socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("FOODIO_BACKEND_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "FOODIO_BACKEND_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
