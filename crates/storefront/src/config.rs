//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPABASE_URL` - Base URL of the hosted platform project
//! - `SUPABASE_ANON_KEY` - Publishable API key (row-level rules apply)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `ADMIN_BASE_URL` - Where to send admins after sign-in
//!   (default: <http://localhost:3001>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Tracing sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use dimakatso_supabase::SupabaseConfig;

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
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Hosted platform connection settings
    pub supabase: SupabaseConfig,
    /// Where admins land after sign-in
    pub admin_base_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
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

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let admin_base_url = get_env_or_default("ADMIN_BASE_URL", "http://localhost:3001");

        let supabase = SupabaseConfig {
            url: get_required_env("SUPABASE_URL")?.trim_end_matches('/').to_string(),
            api_key: SecretString::from(get_required_env("SUPABASE_ANON_KEY")?),
        };

        Ok(Self {
            host,
            port,
            base_url,
            supabase,
            admin_base_url,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_env_f32("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_env_f32("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Absolute URL for the emailed password-reset landing page.
    #[must_use]
    pub fn reset_password_url(&self) -> String {
        format!("{}/reset-password", self.base_url.trim_end_matches('/'))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an f32 environment variable with a default value.
fn get_env_f32(key: &str, default: f32) -> Result<f32, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            supabase: SupabaseConfig {
                url: "https://abc.supabase.co".to_string(),
                api_key: SecretString::from("anon-key"),
            },
            admin_base_url: "http://localhost:3001".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_reset_password_url_handles_trailing_slash() {
        let mut cfg = config();
        cfg.base_url = "https://shop.example.com/".to_string();
        assert_eq!(
            cfg.reset_password_url(),
            "https://shop.example.com/reset-password"
        );
    }
}
