//! Session models and keys.

use serde::{Deserialize, Serialize};

use dimakatso_core::UserId;

/// Session storage keys.
pub mod session_keys {
    /// The signed-in shopper ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
    /// The in-progress cart (`dimakatso_core::Cart`).
    pub const CART: &str = "cart";
}

/// The signed-in shopper as kept in the session store.
///
/// Holds the platform access token so data-service calls run under the
/// user's own row-level rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub access_token: String,
}
