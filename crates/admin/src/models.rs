//! Session models and keys.

use serde::{Deserialize, Serialize};

use dimakatso_core::UserId;

/// Session storage keys.
pub mod session_keys {
    /// The signed-in back-office user ([`super::CurrentAdmin`]).
    pub const CURRENT_ADMIN: &str = "current_admin";
}

/// The signed-in back-office user as kept in the session store.
///
/// Holding a session only proves authentication; the role gate re-checks
/// the profile's role on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: String,
    pub access_token: String,
}
