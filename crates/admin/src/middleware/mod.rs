//! HTTP middleware stack for the back-office.

pub mod admin_gate;
pub mod session;

pub use admin_gate::{RequireAdmin, clear_current_admin, set_current_admin};
pub use session::create_session_layer;
