//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (specials + collection)
//! GET  /about                  - About page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products/{id}          - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout (requires auth)
//! GET  /checkout               - Checkout form
//! POST /checkout               - Place order
//!
//! # Auth
//! GET  /login                  - Login / signup page
//! POST /login                  - Login action
//! POST /signup                 - Signup action
//! POST /logout                 - Logout action
//! POST /forgot-password        - Send recovery email
//! GET  /reset-password         - Reset form (from emailed link)
//! POST /reset-password         - Set new password
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
///
/// All of these hit the platform's auth service, so they sit behind the
/// strict rate limiter.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/forgot-password", post(auth::forgot_password))
        .route(
            "/reset-password",
            get(auth::reset_password_page).post(auth::reset_password),
        )
        .layer(auth_rate_limiter())
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home and static pages
        .route("/", get(home::home))
        .route("/about", get(home::about))
        // Product detail
        .route("/products/{id}", get(products::show))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::submit))
        // Auth routes
        .merge(auth_routes())
}
