//! Server configuration loaded from environment variables.
//!
//! Read once at startup and never changed afterwards.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_API_SECRET` - Shared secret the App Proxy signs requests with
//!
//! ## Optional
//! - `WISHLIST_DATABASE_URL` - `SQLite` connection string (fallback `DATABASE_URL`,
//!   default `sqlite://wishlist.db?mode=rwc`)
//! - `APP_PROXY_SIGNATURE_MODE` - Primary signature scheme, `sha256` (default) or `md5`
//! - `WISHLIST_HOST` - Bind address (default: 127.0.0.1)
//! - `WISHLIST_PORT` - Listen port (default: 3000)
//! - `WISHLIST_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `WISHLIST_AUTO_MIGRATE` - Apply migrations at startup (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use wishlist_proxy_core::{ProxySigner, SignatureMode};

const DEFAULT_DATABASE_URL: &str = "sqlite://wishlist.db?mode=rwc";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Wishlist server configuration.
#[derive(Debug, Clone)]
pub struct WishlistConfig {
    /// `SQLite` connection URL (storage location)
    pub database_url: SecretString,
    /// Maximum number of pooled connections
    pub db_max_connections: u32,
    /// Apply embedded migrations before serving
    pub auto_migrate: bool,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// App Proxy signing configuration
    pub proxy: AppProxyConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. `production`)
    pub sentry_environment: Option<String>,
    /// Fraction of errors reported to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced in Sentry
    pub sentry_traces_sample_rate: f32,
}

/// App Proxy signing configuration.
///
/// Implements `Debug` manually to redact the secret.
#[derive(Clone)]
pub struct AppProxyConfig {
    /// Shared secret used by the platform to sign proxied requests
    pub api_secret: SecretString,
    /// Scheme checked first; the other one is the fallback
    pub signature_mode: SignatureMode,
}

impl std::fmt::Debug for AppProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppProxyConfig")
            .field("api_secret", &"[REDACTED]")
            .field("signature_mode", &self.signature_mode)
            .finish()
    }
}

impl AppProxyConfig {
    /// Build the signer for this configuration.
    #[must_use]
    pub fn signer(&self) -> ProxySigner {
        ProxySigner::new(self.api_secret.clone(), self.signature_mode)
    }

    fn from_env() -> Result<Self, ConfigError> {
        let signature_mode = get_env_or_default("APP_PROXY_SIGNATURE_MODE", "sha256")
            .parse::<SignatureMode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("APP_PROXY_SIGNATURE_MODE".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_secret: get_validated_secret("SHOPIFY_API_SECRET")?,
            signature_mode,
        })
    }
}

impl WishlistConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the shared secret fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = database_url_from_env();
        let db_max_connections = parse_env_or_default("WISHLIST_DB_MAX_CONNECTIONS", "5")?;
        let auto_migrate = parse_env_or_default("WISHLIST_AUTO_MIGRATE", "false")?;
        let host = parse_env_or_default("WISHLIST_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("WISHLIST_PORT", "3000")?;
        let proxy = AppProxyConfig::from_env()?;

        Ok(Self {
            database_url,
            db_max_connections,
            auto_migrate,
            host,
            port,
            proxy,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Resolve the storage location: `WISHLIST_DATABASE_URL`, then
/// `DATABASE_URL`, then a `wishlist.db` file in the working directory.
///
/// Shared with `wp-cli migrate` so both always open the same database.
#[must_use]
pub fn database_url_from_env() -> SecretString {
    resolve_database_url(|key| std::env::var(key).ok())
}

fn resolve_database_url(lookup: impl Fn(&str) -> Option<String>) -> SecretString {
    ["WISHLIST_DATABASE_URL", "DATABASE_URL"]
        .into_iter()
        .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        .map_or_else(
            || SecretString::from(DEFAULT_DATABASE_URL),
            SecretString::from,
        )
}

/// Get an optional environment variable, treating empty as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is present, not a placeholder, and has sufficient entropy.
fn validate_secret_strength(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }

    let lower = value.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the app's API secret key."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let secret = SecretString::from(get_required_env(key)?);
    validate_secret_strength(&secret, key)?;
    Ok(secret)
}
