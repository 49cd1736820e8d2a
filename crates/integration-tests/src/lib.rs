//! Integration tests for Hondana.
//!
//! These tests drive a RUNNING server over HTTP; they do not start one.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server against a seeded database
//! cargo run -p hondana-server
//!
//! # Run the tests (ignored by default)
//! HONDANA_BASE_URL=http://localhost:3000 \
//! HONDANA_TEST_ADMIN_PASSWORD=... \
//! cargo test -p hondana-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `HONDANA_BASE_URL` - Server base URL (default: <http://localhost:3000>)
//! - `HONDANA_TEST_ADMIN_PASSWORD` - The server's `ADMIN_PASSWORD`

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use reqwest::Client;
use serde_json::Value;

/// Base URL of the server under test (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("HONDANA_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// The admin password the server under test was started with.
#[must_use]
pub fn admin_password() -> String {
    std::env::var("HONDANA_TEST_ADMIN_PASSWORD").expect("HONDANA_TEST_ADMIN_PASSWORD not set")
}

/// A cookie-keeping HTTP client.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Log the client in via the shared admin password; panics on failure.
pub async fn login(client: &Client) {
    let resp = client
        .post(format!("{}/api/admin/login", base_url()))
        .json(&serde_json::json!({ "password": admin_password() }))
        .send()
        .await
        .expect("login request failed");
    assert!(
        resp.status().is_success(),
        "login failed with status {}",
        resp.status()
    );
}

/// Read a response body as JSON, asserting the envelope's `success` flag.
pub async fn json_body(resp: reqwest::Response, expect_success: bool) -> Value {
    let body: Value = resp.json().await.expect("response body is not JSON");
    assert_eq!(
        body["success"],
        Value::Bool(expect_success),
        "unexpected envelope: {body}"
    );
    body
}

/// A unique name for the current test run, keeping re-runs collision-free.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}
