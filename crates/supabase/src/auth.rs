//! Client for the platform's auth service.
//!
//! Wraps the session endpoints the shop actually uses: password sign-in,
//! sign-up, sign-out, current-user lookup, and the password-recovery flow
//! (request email, verify emailed token, set new password). No tokens are
//! cached here - callers keep the session in their own store.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{SupabaseConfig, SupabaseError, error_for_response};

/// The authenticated identity as returned by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// An issued session: tokens plus the user they belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RecoverRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    token_hash: &'a str,
}

#[derive(Serialize)]
struct PasswordUpdate<'a> {
    password: &'a str,
}

/// Client for the platform auth endpoints.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    base: String,
    api_key: String,
}

impl AuthClient {
    /// Create a new auth client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                base: format!("{}/auth/v1", config.url),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, format!("{}{path}", self.inner.base))
            .header("apikey", &self.inner.api_key)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Api`] when the credentials are rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, SupabaseError> {
        let response = self
            .request(reqwest::Method::POST, "/token")
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Register a new account.
    ///
    /// Returns the issued session when the project auto-confirms email
    /// addresses, `None` when a confirmation email was sent instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is already registered or the
    /// password is rejected by the service's policy.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthSession>, SupabaseError> {
        let response = self
            .request(reqwest::Method::POST, "/signup")
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let body: serde_json::Value = response.json().await?;
        if body.get("access_token").is_some() {
            Ok(Some(serde_json::from_value(body)?))
        } else {
            Ok(None)
        }
    }

    /// Revoke the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the token. An
    /// already-expired token is reported as an API error too; callers
    /// clearing their own session state may ignore it.
    #[instrument(skip(self, access_token))]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let response = self
            .request(reqwest::Method::POST, "/logout")
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(())
    }

    /// Fetch the user a token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid or expired token.
    #[instrument(skip(self, access_token))]
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        let response = self
            .request(reqwest::Method::GET, "/user")
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Readiness probe against the auth service.
    ///
    /// # Errors
    ///
    /// Returns an error when the service is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), SupabaseError> {
        let response = self.request(reqwest::Method::GET, "/health").send().await?;
        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(())
    }

    /// Send a password-recovery email with a link back to `redirect_to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service refuses the request (rate limits,
    /// malformed address). An unknown address is NOT an error - the
    /// service answers success either way to avoid account enumeration.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), SupabaseError> {
        let response = self
            .request(reqwest::Method::POST, "/recover")
            .query(&[("redirect_to", redirect_to)])
            .json(&RecoverRequest { email })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(())
    }

    /// Exchange an emailed recovery token for a session.
    ///
    /// # Errors
    ///
    /// Returns an error for a used, expired, or forged token.
    #[instrument(skip(self, token_hash))]
    pub async fn verify_recovery(&self, token_hash: &str) -> Result<AuthSession, SupabaseError> {
        let response = self
            .request(reqwest::Method::POST, "/verify")
            .json(&VerifyRequest {
                kind: "recovery",
                token_hash,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Set a new password for the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or the password fails the
    /// service's policy.
    #[instrument(skip(self, access_token, new_password))]
    pub async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), SupabaseError> {
        let response = self
            .request(reqwest::Method::PUT, "/user")
            .bearer_auth(access_token)
            .json(&PasswordUpdate {
                password: new_password,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_deserializes_from_token_grant_response() {
        let body = r#"{
            "access_token": "eyJ.header.sig",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "v1.refresh",
            "user": {
                "id": "3f2e9c1a-0b5d-4f7e-9a1b-2c3d4e5f6a7b",
                "email": "thandi@example.com",
                "role": "authenticated"
            }
        }"#;

        let session: AuthSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.refresh_token, "v1.refresh");
        assert_eq!(session.user.email.as_deref(), Some("thandi@example.com"));
    }

    #[test]
    fn test_user_tolerates_missing_email() {
        let body = r#"{"id": "3f2e9c1a-0b5d-4f7e-9a1b-2c3d4e5f6a7b"}"#;
        let user: AuthUser = serde_json::from_str(body).unwrap();
        assert!(user.email.is_none());
    }
}
