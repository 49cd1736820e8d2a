//! Integration tests for the admin login/logout flow.
//!
//! Requires a running server; see the crate docs for environment variables.
//! Run with: cargo test -p hondana-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;

use hondana_integration_tests::{admin_password, base_url, client, json_body};

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_login_logout_flow() {
    let client = client();
    let base_url = base_url();

    // Wrong password is rejected
    let resp = client
        .post(format!("{base_url}/api/admin/login"))
        .json(&json!({ "password": "definitely-wrong" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(resp, false).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    // No session yet
    let resp = client
        .get(format!("{base_url}/api/admin/me"))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Correct password sets the session cookie
    let resp = client
        .post(format!("{base_url}/api/admin/login"))
        .json(&json!({ "password": admin_password() }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp, true).await;
    assert_eq!(body["data"]["admin"]["role"], "admin");

    // The session now authenticates /me
    let resp = client
        .get(format!("{base_url}/api/admin/me"))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp, true).await;
    assert_eq!(body["data"]["admin"]["id"], "admin-1");

    // Logout clears the cookie
    let resp = client
        .post(format!("{base_url}/api/admin/logout"))
        .send()
        .await
        .expect("logout request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/admin/me"))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_empty_password_is_a_validation_error() {
    let client = client();

    let resp = client
        .post(format!("{}/api/admin/login", base_url()))
        .json(&json!({ "password": "" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp, false).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_forged_session_cookie_is_rejected() {
    let base_url = base_url();
    let client = reqwest::Client::new();

    // A client-trusted JSON payload without a valid signature must not count
    // as a login.
    let forged = "eyJpZCI6ImFkbWluLTEifQ.0000000000000000000000000000000000000000000000000000000000000000";
    let resp = client
        .get(format!("{base_url}/api/admin/me"))
        .header("Cookie", format!("hondana_admin_session={forged}"))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_admin_routes_require_session() {
    let client = reqwest::Client::new();
    let base_url = base_url();

    for path in [
        "/api/admin/stores",
        "/api/admin/areas",
        "/api/admin/categories",
        "/api/admin/category-tags",
    ] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("request failed");
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "{path} should require a session"
        );
    }
}
