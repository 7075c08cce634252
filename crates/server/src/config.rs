//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CURBSIDE_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   generic `DATABASE_URL`)
//!
//! ## Optional
//! - `CURBSIDE_HOST` - Bind address (default: 127.0.0.1)
//! - `CURBSIDE_PORT` - Listen port (default: 3000)
//! - `CURBSIDE_BASE_URL` - Public URL (default: `http://localhost:3000`);
//!   session cookies are marked Secure when this is https
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (e.g. `production`)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the service
    pub base_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
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

        let database_url = get_database_url("CURBSIDE_DATABASE_URL")?;
        let host = get_env_or_default("CURBSIDE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CURBSIDE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CURBSIDE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CURBSIDE_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("CURBSIDE_BASE_URL", "http://localhost:3000");
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public base URL is served over HTTPS.
    ///
    /// Session cookies are only marked Secure in that case.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by managed
/// postgres attach flows).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/curbside_test".to_string()),
            host: "127.0.0.1".parse().expect("valid addr"),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = test_config();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn is_secure_only_for_https_base_url() {
        let mut config = test_config();
        assert!(!config.is_secure());

        config.base_url = "https://orders.curbside.app".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn config_error_names_the_variable() {
        let err = ConfigError::MissingEnvVar("CURBSIDE_DATABASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: CURBSIDE_DATABASE_URL"
        );
    }
}
