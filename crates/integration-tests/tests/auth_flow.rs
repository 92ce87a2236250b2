//! Integration tests for seller auth flows.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The backend server running (cargo run -p shopyard-backend)
//!
//! Run with: cargo test -p shopyard-integration-tests -- --ignored
//!
//! Registration tests additionally assume a fresh database (the first-run
//! gate closes after one seller exists).

use reqwest::StatusCode;
use serde_json::{Value, json};

use shopyard_integration_tests::{base_url, client, unique_email};

// ============================================================================
// Session Status
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend server"]
async fn test_auth_status_without_session() {
    let resp = client()
        .get(format!("{}/auth", base_url()))
        .send()
        .await
        .expect("Failed to reach /auth");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["success"], json!(false));
}

// ============================================================================
// Email Probe
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend server"]
async fn test_email_probe_unknown_email() {
    let resp = client()
        .get(format!("{}/auth/{}", base_url(), unique_email()))
        .send()
        .await
        .expect("Failed to reach probe");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.expect("body").is_empty());
}

// ============================================================================
// First-Run Registration
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend server and a fresh database"]
async fn test_registration_bootstrap_flow() {
    let http = client();
    let email = unique_email();

    // Register the bootstrap account
    let resp = http
        .post(format!("{}/auth/registration", base_url()))
        .json(&json!({
            "name": "Bootstrap",
            "email": email,
            "password": "a long enough password",
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(true));

    // The new account is logged in and is a superuser (admin everywhere)
    let resp = http
        .get(format!("{}/auth", base_url()))
        .send()
        .await
        .expect("Failed to reach /auth");
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["email"], json!(email));
    assert_eq!(body["role"], json!("admin"));

    // The probe now sees the email
    let resp = http
        .get(format!("{}/auth/{email}", base_url()))
        .send()
        .await
        .expect("Failed to reach probe");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // A second registration is refused
    let resp = http
        .post(format!("{}/auth/registration", base_url()))
        .json(&json!({
            "name": "Second",
            "email": unique_email(),
            "password": "another password",
        }))
        .send()
        .await
        .expect("Failed to re-register");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Logout destroys the session
    let resp = http
        .post(format!("{}/auth/logout", base_url()))
        .send()
        .await
        .expect("Failed to logout");
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(true));

    // A second logout has nothing to do
    let resp = http
        .post(format!("{}/auth/logout", base_url()))
        .send()
        .await
        .expect("Failed to logout twice");
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(false));
}

// ============================================================================
// Superuser Login
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend server with a registered superuser"]
async fn test_superuser_login_folds_email_case() {
    let email = std::env::var("IT_SUPERUSER_EMAIL").unwrap_or_else(|_| "ops@example.com".into());
    let password = std::env::var("IT_SUPERUSER_PASSWORD").unwrap_or_else(|_| "ops password".into());

    let resp = client()
        .post(format!("{}/superuser/login", base_url()))
        .json(&json!({
            "email": email.to_uppercase(),
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to login");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["role"], json!("superuser"));
}

#[tokio::test]
#[ignore = "Requires running backend server"]
async fn test_superuser_login_unknown_email() {
    let resp = client()
        .post(format!("{}/superuser/login", base_url()))
        .json(&json!({
            "email": unique_email(),
            "password": "irrelevant",
        }))
        .send()
        .await
        .expect("Failed to reach login");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["reason"], json!("no-such-user"));
}

#[tokio::test]
#[ignore = "Requires running backend server"]
async fn test_superuser_status_precondition_chain() {
    let resp = client()
        .get(format!("{}/superuser/auth", base_url()))
        .send()
        .await
        .expect("Failed to reach status");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body");

    // Without a session this is either no-users (fresh db) or not-logged-in;
    // in both cases the response is a bare reason with no fleet data.
    assert_eq!(body["success"], json!(false));
    let reason = body["reason"].as_str().expect("reason");
    assert!(["no-users", "not-logged-in"].contains(&reason));
    assert!(body.get("networks").is_none());
    assert!(body.get("shops").is_none());
}
