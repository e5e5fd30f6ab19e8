//! Integration tests for the back-office role gate.
//!
//! These tests require:
//! - A running admin server (cargo run -p dimakatso-admin)
//! - Platform credentials in the environment
//! - `ADMIN_TEST_EMAIL`/`ADMIN_TEST_PASSWORD` for an admin account, and
//!   `CUSTOMER_TEST_EMAIL`/`CUSTOMER_TEST_PASSWORD` for a non-admin one
//!
//! Run with: cargo test -p dimakatso-integration-tests -- --ignored

use reqwest::{Client, StatusCode};

use dimakatso_integration_tests::{admin_base_url, session_client};

async fn sign_in(client: &Client, base_url: &str, email: &str, password: &str) {
    let resp = client
        .post(format!("{base_url}/login"))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .expect("Failed to sign in");
    assert!(resp.status().is_success() || resp.status().is_redirection());
}

#[tokio::test]
#[ignore = "Requires running admin server and platform credentials"]
async fn test_anonymous_request_redirects_to_login() {
    let client = session_client();
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to request products");

    // The gate bounces anonymous requests to the login page.
    assert_eq!(resp.url().path(), "/login");
}

#[tokio::test]
#[ignore = "Requires running admin server and platform credentials"]
async fn test_non_admin_session_is_forbidden() {
    let client = session_client();
    let base_url = admin_base_url();

    let email = std::env::var("CUSTOMER_TEST_EMAIL").expect("CUSTOMER_TEST_EMAIL not set");
    let password =
        std::env::var("CUSTOMER_TEST_PASSWORD").expect("CUSTOMER_TEST_PASSWORD not set");
    sign_in(&client, &base_url, &email, &password).await;

    let resp = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to request products");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Admin access required"));
}

#[tokio::test]
#[ignore = "Requires running admin server and platform credentials"]
async fn test_admin_session_reaches_protected_content() {
    let client = session_client();
    let base_url = admin_base_url();

    let email = std::env::var("ADMIN_TEST_EMAIL").expect("ADMIN_TEST_EMAIL not set");
    let password = std::env::var("ADMIN_TEST_PASSWORD").expect("ADMIN_TEST_PASSWORD not set");
    sign_in(&client, &base_url, &email, &password).await;

    let resp = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to request products");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("data-table") || body.contains("No products found"));
}

#[tokio::test]
#[ignore = "Requires running admin server and platform credentials"]
async fn test_order_list_paginates() {
    let client = session_client();
    let base_url = admin_base_url();

    let email = std::env::var("ADMIN_TEST_EMAIL").expect("ADMIN_TEST_EMAIL not set");
    let password = std::env::var("ADMIN_TEST_PASSWORD").expect("ADMIN_TEST_PASSWORD not set");
    sign_in(&client, &base_url, &email, &password).await;

    let resp = client
        .get(format!("{base_url}/orders?page=1"))
        .send()
        .await
        .expect("Failed to request orders");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Page 1"));
}
