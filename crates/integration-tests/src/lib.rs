//! Integration tests for Dimakatso Salts.
//!
//! # Running Tests
//!
//! ```bash
//! # Start both servers against a platform project with the starter data
//! cargo run -p dimakatso-storefront &
//! cargo run -p dimakatso-admin &
//!
//! # Run integration tests
//! cargo test -p dimakatso-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart and checkout flow over HTTP
//! - `admin_gate` - Role-gated access to the back-office
//!
//! All tests are `#[ignore]`-gated: they need running servers and real
//! platform credentials, so the default `cargo test` run skips them.

use reqwest::Client;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the back-office (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create a cookie-holding client, so the session (and with it the cart)
/// survives across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
