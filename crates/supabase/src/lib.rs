//! Clients for the hosted platform backing the shop.
//!
//! # Architecture
//!
//! The platform is the source of truth - NO local database, direct API
//! calls over REST:
//!
//! - [`AuthClient`] - session auth: sign-in/up/out, password recovery
//! - [`DataClient`] - filtered/sorted/paginated row queries and CRUD
//!   against named relations (`products`, `orders`, `profiles`)
//! - [`StorageClient`] - binary uploads and public URL retrieval
//!
//! The storefront talks to the data service with the signed-in user's
//! bearer token so the platform's row-level rules apply; the back-office
//! and CLI use the service key.
//!
//! # Example
//!
//! ```rust,ignore
//! use dimakatso_supabase::{DataClient, SupabaseConfig};
//!
//! let data = DataClient::new(&config);
//! let rows: Vec<ProductRow> = data
//!     .from("products")
//!     .eq("is_active", "true")
//!     .order_desc("created_at")
//!     .fetch()
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod auth;
mod data;
mod storage;
pub mod types;

pub use auth::{AuthClient, AuthSession, AuthUser};
pub use data::{DataClient, QueryBuilder};
pub use storage::StorageClient;

use secrecy::SecretString;
use thiserror::Error;

/// Connection settings for the hosted platform.
///
/// Implements `Debug` manually to redact the API key: the back-office and
/// CLI hold the service role key, which bypasses row-level rules.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project base URL (e.g., `https://abc.supabase.co`), no trailing slash.
    pub url: String,
    /// API key: the publishable key for the storefront, the service role
    /// key for the back-office and CLI.
    pub api_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Errors that can occur when talking to the platform APIs.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the call.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Row or object not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl SupabaseError {
    /// Whether the error is the platform refusing credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 400 | 401 | 403, .. })
    }
}

/// Extract a human-readable message from an error response body.
///
/// The auth, data, and storage services each use slightly different error
/// envelopes; try the known keys before falling back to the raw body.
fn api_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error", "hint"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str())
                && !text.is_empty()
            {
                return text.to_string();
            }
        }
    }
    body.chars().take(200).collect()
}

/// Convert a non-success response into a [`SupabaseError::Api`].
async fn error_for_response(response: reqwest::Response) -> SupabaseError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status, body = %body.chars().take(500).collect::<String>(), "platform API error");
    SupabaseError::Api {
        status,
        message: api_error_message(&body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SupabaseError::NotFound("profile 42".to_string());
        assert_eq!(err.to_string(), "Not found: profile 42");

        let err = SupabaseError::Api {
            status: 401,
            message: "Invalid login credentials".to_string(),
        };
        assert_eq!(err.to_string(), "API error (401): Invalid login credentials");
    }

    #[test]
    fn test_api_error_message_known_keys() {
        assert_eq!(
            api_error_message(r#"{"message":"duplicate key value"}"#),
            "duplicate key value"
        );
        assert_eq!(
            api_error_message(r#"{"error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(api_error_message(r#"{"msg":"Token expired"}"#), "Token expired");
    }

    #[test]
    fn test_api_error_message_falls_back_to_body() {
        assert_eq!(api_error_message("upstream timed out"), "upstream timed out");
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = SupabaseError::Api {
            status: 401,
            message: String::new(),
        };
        assert!(err.is_unauthorized());

        let err = SupabaseError::Api {
            status: 500,
            message: String::new(),
        };
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            api_key: SecretString::from("very_secret_service_key"),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("https://abc.supabase.co"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("very_secret_service_key"));
    }
}
