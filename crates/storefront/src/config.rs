//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ESTORE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `ESTORE_HOST` - Bind address (default: 127.0.0.1)
//! - `ESTORE_PORT` - Listen port (default: 3000)
//! - `ESTORE_BASE_URL` - Public URL; an `https` URL marks session cookies secure
//!   (default: `http://localhost:3000`)
//! - `ESTORE_CHECKOUT_CLEAR_POLICY` - `all` or `submitted` (default: all)
//! - `ESTORE_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (default: development)
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

use crate::services::ClearPolicy;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Upper bound on pooled database connections
    pub db_max_connections: u32,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// What checkout does with the cart after a partial failure
    pub clear_policy: ClearPolicy,
    /// Error reporting
    pub sentry: SentryConfig,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("database_url", &"[REDACTED]")
            .field("db_max_connections", &self.db_max_connections)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("clear_policy", &self.clear_policy)
            .field("sentry", &self.sentry)
            .finish()
    }
}

/// Sentry settings. Reporting is disabled when `dsn` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: String,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
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
        Self::from_source(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get_database_url(env, "ESTORE_DATABASE_URL")?;
        let db_max_connections = parse_env_or_default(env, "ESTORE_DB_MAX_CONNECTIONS", 10_u32)?;
        if db_max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ESTORE_DB_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let host = parse_env_or_default(env, "ESTORE_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env_or_default(env, "ESTORE_PORT", 3000_u16)?;
        let base_url = get_env_or_default(env, "ESTORE_BASE_URL", "http://localhost:3000");
        let clear_policy = parse_env_or_default(env, "ESTORE_CHECKOUT_CLEAR_POLICY", ClearPolicy::All)?;

        let sentry = SentryConfig {
            dsn: get_optional_env(env, "SENTRY_DSN"),
            environment: get_env_or_default(env, "SENTRY_ENVIRONMENT", "development"),
            sample_rate: parse_rate(env, "SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: parse_rate(env, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        };

        Ok(Self {
            database_url,
            db_max_connections,
            host,
            port,
            base_url,
            clear_policy,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(
    env: &dyn Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Result<SecretString, ConfigError> {
    env(primary_key)
        .or_else(|| env("DATABASE_URL"))
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, treating empty as unset.
fn get_optional_env(env: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    env(key).filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(env, key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(
    env: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(env, key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a sample rate in `[0.0, 1.0]`.
fn parse_rate(
    env: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: f32,
) -> Result<f32, ConfigError> {
    let rate = parse_env_or_default(env, key, default)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("{rate} is outside 0.0..=1.0"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_source(&|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("ESTORE_DATABASE_URL", "postgres://localhost/estore")]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.clear_policy, ClearPolicy::All);
        assert!(!config.is_https());
        assert_eq!(config.sentry.dsn, None);
        assert_eq!(config.sentry.environment, "development");
    }

    #[test]
    fn test_missing_database_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "ESTORE_DATABASE_URL"));
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://fallback/db")]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fallback/db");
    }

    #[test]
    fn test_primary_database_url_wins() {
        let config = load(&[
            ("ESTORE_DATABASE_URL", "postgres://primary/db"),
            ("DATABASE_URL", "postgres://fallback/db"),
        ])
        .unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://primary/db");
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[
            ("ESTORE_DATABASE_URL", "postgres://localhost/estore"),
            ("ESTORE_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ESTORE_PORT"));
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let err = load(&[
            ("ESTORE_DATABASE_URL", "postgres://localhost/estore"),
            ("ESTORE_DB_MAX_CONNECTIONS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_clear_policy() {
        let config = load(&[
            ("ESTORE_DATABASE_URL", "postgres://localhost/estore"),
            ("ESTORE_CHECKOUT_CLEAR_POLICY", "submitted"),
        ])
        .unwrap();
        assert_eq!(config.clear_policy, ClearPolicy::Submitted);

        assert!(
            load(&[
                ("ESTORE_DATABASE_URL", "postgres://localhost/estore"),
                ("ESTORE_CHECKOUT_CLEAR_POLICY", "never"),
            ])
            .is_err()
        );
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        let err = load(&[
            ("ESTORE_DATABASE_URL", "postgres://localhost/estore"),
            ("SENTRY_TRACES_SAMPLE_RATE", "1.5"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SENTRY_TRACES_SAMPLE_RATE"));
    }

    #[test]
    fn test_https_base_url() {
        let config = load(&[
            ("ESTORE_DATABASE_URL", "postgres://localhost/estore"),
            ("ESTORE_BASE_URL", "https://shop.example.com"),
        ])
        .unwrap();
        assert!(config.is_https());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("ESTORE_DATABASE_URL", "postgres://user:hunter2@db/estore")]).unwrap();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
    }
}
