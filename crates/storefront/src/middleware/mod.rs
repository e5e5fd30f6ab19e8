//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//! 4. Rate limiting on auth routes (governor)

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, set_current_user};
pub use rate_limit::auth_rate_limiter;
pub use session::create_session_layer;
