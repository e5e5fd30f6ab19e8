//! Back-office sign-in and sign-out.
//!
//! Signing in only authenticates; whether the account may see anything is
//! decided per request by the role gate.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use dimakatso_core::UserId;

use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    /// Echoed email value.
    pub email: String,
    /// Inline error message, empty when none.
    pub error: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {
        email: String::new(),
        error: String::new(),
    }
}

/// Sign in and store the session.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let auth_session = match state.auth().sign_in(&form.email, &form.password).await {
        Ok(auth_session) => auth_session,
        Err(e) => {
            tracing::warn!("Back-office sign-in rejected: {e}");
            return LoginTemplate {
                email: form.email,
                error: "Invalid email or password.".to_string(),
            }
            .into_response();
        }
    };

    let admin = CurrentAdmin {
        id: UserId::new(auth_session.user.id),
        email: auth_session.user.email.clone().unwrap_or_default(),
        access_token: auth_session.access_token,
    };

    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!("Failed to store session admin: {e}");
        return LoginTemplate {
            email: admin.email,
            error: "Login failed. Please try again.".to_string(),
        }
        .into_response();
    }

    Redirect::to("/").into_response()
}

/// Sign out.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(admin)) = session
        .get::<CurrentAdmin>(crate::models::session_keys::CURRENT_ADMIN)
        .await
        && let Err(e) = state.auth().sign_out(&admin.access_token).await
    {
        tracing::warn!("Platform sign-out failed: {e}");
    }

    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear session admin: {e}");
    }

    Redirect::to("/login").into_response()
}
