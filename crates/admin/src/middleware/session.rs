//! Session middleware configuration.
//!
//! In-memory sessions; a restart signs every admin out, which is fine for
//! an internal tool.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::AdminConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "dk_admin_session";

/// Session expiry time in seconds (8 hours).
const SESSION_EXPIRY_SECONDS: i64 = 8 * 60 * 60;

/// Create the session layer with the in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
