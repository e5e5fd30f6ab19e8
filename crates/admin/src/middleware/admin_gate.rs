//! Role gate for the back-office.
//!
//! Every gated request walks the same ladder: while the session and role
//! lookup are in flight the request is simply not answered yet; no session
//! ends in a redirect to the login page; a session whose profile is
//! missing, unreadable, or carries any role other than `admin` gets the
//! access-denied view with no retry; only a verified `admin` role reaches
//! the handler. Lookup failures deny - the gate fails closed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use dimakatso_core::StoreRole;
use dimakatso_supabase::types::ProfileRow;

use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Extractor that requires a session with the `admin` role.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Access-denied page template.
#[derive(Template, WebTemplate)]
#[template(path = "forbidden.html")]
pub struct ForbiddenTemplate {}

/// Outcome when the gate refuses a request.
pub enum GateRejection {
    /// No session: go sign in.
    Unauthenticated,
    /// Session present but not an admin (or the role could not be read).
    Forbidden,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => Redirect::to("/login").into_response(),
            Self::Forbidden => {
                (StatusCode::FORBIDDEN, ForbiddenTemplate {}).into_response()
            }
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = GateRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(GateRejection::Unauthenticated)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(GateRejection::Unauthenticated)?;

        // Single keyed role lookup under the service key. Any failure -
        // missing row, API error, unknown role - denies access.
        let profile: ProfileRow = state
            .data()
            .from("profiles")
            .eq("id", admin.id)
            .fetch_one()
            .await
            .map_err(|e| {
                tracing::warn!("Admin role lookup failed: {e}");
                GateRejection::Forbidden
            })?;

        if profile.role() == Some(StoreRole::Admin) {
            Ok(Self(admin))
        } else {
            Err(GateRejection::Forbidden)
        }
    }
}

/// Helper to set the back-office user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the back-office user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}
