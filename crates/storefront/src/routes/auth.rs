//! Auth route handlers: login, signup, logout, password recovery.
//!
//! All credential checks happen on the platform's auth service; these
//! handlers only translate between forms, the session store, and that
//! service. After sign-in the profile role decides whether the shopper
//! lands on the storefront or is pointed at the back-office.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use dimakatso_core::{StoreRole, UserId};
use dimakatso_supabase::types::ProfileRow;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::set_current_user;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Minimum accepted password length, matching the platform's default.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Login / signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    /// Render the signup variant of the form.
    pub signup: bool,
    /// Echoed email value.
    pub email: String,
    /// Inline error message, empty when none.
    pub error: String,
    /// Inline notice (reset email sent, confirm account), empty when none.
    pub notice: String,
}

impl LoginTemplate {
    fn login_error(email: String, error: String) -> Self {
        Self {
            signup: false,
            email,
            error,
            notice: String::new(),
        }
    }
}

/// Reset-password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    /// Whether the shopper arrived through the emailed link.
    pub ready: bool,
    /// Recovery token carried through the form round-trip.
    pub token_hash: String,
    /// Inline error message, empty when none.
    pub error: String,
}

/// Query for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// `?mode=signup` renders the signup variant.
    pub mode: Option<String>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

/// Forgot-password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Query for the reset page (from the emailed link).
#[derive(Debug, Deserialize)]
pub struct ResetPasswordQuery {
    pub token_hash: Option<String>,
}

/// Reset-password form data.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub token_hash: String,
    pub password: String,
    pub confirm_password: String,
}

/// Display the login / signup page.
#[instrument(skip_all)]
pub async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginTemplate {
        signup: query.mode.as_deref() == Some("signup"),
        email: String::new(),
        error: String::new(),
        notice: String::new(),
    }
}

/// Sign in with email and password.
///
/// On success the session holds the shopper and the profile role decides
/// the destination: admins go to the back-office, everyone else home. A
/// failed role lookup keeps the shopper signed in but reports that admin
/// access could not be verified, mirroring the page this replaced.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let auth_session = match state.auth().sign_in(&form.email, &form.password).await {
        Ok(auth_session) => auth_session,
        Err(e) => {
            tracing::warn!("Sign-in rejected: {e}");
            return LoginTemplate::login_error(form.email, user_facing_auth_error(&e))
                .into_response();
        }
    };

    let user = CurrentUser {
        id: UserId::new(auth_session.user.id),
        email: auth_session.user.email.clone().unwrap_or_default(),
        access_token: auth_session.access_token.clone(),
    };

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to store session user: {e}");
        return LoginTemplate::login_error(
            form.email,
            "Login failed. Please try again.".to_string(),
        )
        .into_response();
    }
    set_sentry_user(&user.id, Some(&user.email));

    // Role lookup under the user's own token.
    let profile: Result<ProfileRow, _> = state
        .data()
        .from("profiles")
        .eq("id", user.id)
        .bearer(&user.access_token)
        .fetch_one()
        .await;

    match profile {
        Err(e) => {
            tracing::warn!("Profile role lookup failed: {e}");
            LoginTemplate::login_error(
                form.email,
                "Unable to verify admin access.".to_string(),
            )
            .into_response()
        }
        Ok(profile) if profile.role() == Some(StoreRole::Admin) => {
            Redirect::to(&state.config().admin_base_url).into_response()
        }
        Ok(_) => Redirect::to("/").into_response(),
    }
}

/// Register a new account.
#[instrument(skip(state, session, form))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match state.auth().sign_up(&form.email, &form.password).await {
        Ok(Some(auth_session)) => {
            let user = CurrentUser {
                id: UserId::new(auth_session.user.id),
                email: auth_session.user.email.clone().unwrap_or_default(),
                access_token: auth_session.access_token.clone(),
            };
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to store session user: {e}");
            }
            set_sentry_user(&user.id, Some(&user.email));
            Redirect::to("/").into_response()
        }
        Ok(None) => LoginTemplate {
            signup: false,
            email: form.email,
            error: String::new(),
            notice: "Check your email to confirm your account, then log in.".to_string(),
        }
        .into_response(),
        Err(e) => {
            tracing::warn!("Sign-up rejected: {e}");
            LoginTemplate {
                signup: true,
                email: form.email,
                error: user_facing_auth_error(&e),
                notice: String::new(),
            }
            .into_response()
        }
    }
}

/// Sign out and reset the session.
///
/// The platform revocation is best-effort; the local session is flushed
/// either way, which also empties the cart.
#[instrument(skip(state, session, user))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    crate::middleware::OptionalAuth(user): crate::middleware::OptionalAuth,
) -> Response {
    if let Some(user) = user
        && let Err(e) = state.auth().sign_out(&user.access_token).await
    {
        tracing::warn!("Platform sign-out failed: {e}");
    }

    clear_sentry_user();
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/").into_response()
}

/// Send a password-recovery email.
#[instrument(skip(state, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    if form.email.trim().is_empty() {
        return LoginTemplate {
            signup: false,
            email: String::new(),
            error: String::new(),
            notice: "Enter your email first, then try again.".to_string(),
        }
        .into_response();
    }

    let redirect_to = state.config().reset_password_url();
    match state
        .auth()
        .send_password_reset(form.email.trim(), &redirect_to)
        .await
    {
        Ok(()) => LoginTemplate {
            signup: false,
            email: form.email,
            error: String::new(),
            notice: "Password reset link sent. Check your email.".to_string(),
        }
        .into_response(),
        Err(e) => {
            tracing::warn!("Password reset request failed: {e}");
            LoginTemplate::login_error(form.email, user_facing_auth_error(&e)).into_response()
        }
    }
}

/// Display the reset-password page.
///
/// Without the emailed token the page only tells the shopper to use the
/// link from their inbox.
#[instrument(skip_all)]
pub async fn reset_password_page(Query(query): Query<ResetPasswordQuery>) -> impl IntoResponse {
    let token_hash = query.token_hash.unwrap_or_default();
    ResetPasswordTemplate {
        ready: !token_hash.is_empty(),
        token_hash,
        error: String::new(),
    }
}

/// Set a new password using the emailed recovery token.
#[instrument(skip(state, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let render_error = |error: String| {
        ResetPasswordTemplate {
            ready: true,
            token_hash: form.token_hash.clone(),
            error,
        }
        .into_response()
    };

    if form.password.len() < MIN_PASSWORD_LENGTH {
        return render_error(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }
    if form.password != form.confirm_password {
        return render_error("Passwords do not match.".to_string());
    }

    // Exchange the emailed token for a short-lived session first; only
    // that session may set the new password.
    let auth_session = match state.auth().verify_recovery(&form.token_hash).await {
        Ok(auth_session) => auth_session,
        Err(e) => {
            tracing::warn!("Recovery token rejected: {e}");
            return render_error(
                "Reset link is invalid or has expired. Request a new one.".to_string(),
            );
        }
    };

    match state
        .auth()
        .update_password(&auth_session.access_token, &form.password)
        .await
    {
        Ok(()) => Redirect::to("/login").into_response(),
        Err(e) => {
            tracing::warn!("Password update failed: {e}");
            render_error(user_facing_auth_error(&e))
        }
    }
}

/// Reduce a platform auth error to a message safe to show inline.
fn user_facing_auth_error(error: &dimakatso_supabase::SupabaseError) -> String {
    use dimakatso_supabase::SupabaseError;

    match error {
        SupabaseError::Api { message, .. } if !message.is_empty() => message.clone(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimakatso_supabase::SupabaseError;

    #[test]
    fn test_api_messages_are_shown_inline() {
        let err = SupabaseError::Api {
            status: 400,
            message: "Invalid login credentials".to_string(),
        };
        assert_eq!(user_facing_auth_error(&err), "Invalid login credentials");
    }

    #[test]
    fn test_transport_errors_are_not_leaked() {
        let err = SupabaseError::NotFound("profiles".to_string());
        assert_eq!(
            user_facing_auth_error(&err),
            "Something went wrong. Please try again."
        );
    }
}
