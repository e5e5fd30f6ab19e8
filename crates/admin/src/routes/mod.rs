//! HTTP route handlers for the back-office.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Dashboard (counts)
//! GET  /health                  - Health check
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Login action
//! POST /logout                  - Logout action
//!
//! # Products (role-gated)
//! GET  /products                - Paginated, filterable list
//! GET  /products/new            - Create form
//! POST /products                - Create (multipart, optional image)
//! GET  /products/{id}/edit      - Edit form
//! POST /products/{id}           - Update (multipart, optional image)
//! POST /products/{id}/delete    - Delete
//!
//! # Orders (role-gated)
//! GET  /orders                  - Paginated list, newest first
//! GET  /orders/{id}             - Order detail with line snapshot
//! ```

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product resource router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new))
        .route("/{id}/edit", get(products::edit))
        .route("/{id}", post(products::update))
        .route("/{id}/delete", post(products::delete))
}

/// Create the order resource router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the back-office.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
}
