//! Integration tests for shop-token gated endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The backend server running (cargo run -p shopyard-backend)
//!
//! Run with: cargo test -p shopyard-integration-tests -- --ignored
//!
//! Tests that exercise a real shop expect `IT_SHOP_TOKEN` to name an
//! existing shop's auth token.

use reqwest::StatusCode;
use serde_json::{Value, json};

use shopyard_integration_tests::{base_url, client};

fn shop_token() -> Option<String> {
    std::env::var("IT_SHOP_TOKEN").ok()
}

// ============================================================================
// Shop Auth Token Gate
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend server"]
async fn test_password_gate_requires_shop_token() {
    let resp = client()
        .get(format!("{}/password", base_url()))
        .send()
        .await
        .expect("Failed to reach gate");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
#[ignore = "Requires running backend server"]
async fn test_config_requires_seller_session() {
    // A shop token alone is not enough for /config - it needs a seller too
    let mut req = client().get(format!("{}/config", base_url()));
    if let Some(token) = shop_token() {
        req = req.bearer_auth(token);
    }

    let resp = req.send().await.expect("Failed to reach config");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Password Gate
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend server and IT_SHOP_TOKEN"]
async fn test_password_gate_unlock_cycle() {
    let Some(token) = shop_token() else {
        panic!("IT_SHOP_TOKEN must name an existing shop");
    };
    let password = std::env::var("IT_SHOP_PASSWORD").unwrap_or_else(|_| "gate password".into());
    let http = client();

    // Wrong password leaves the gate locked
    let resp = http
        .post(format!("{}/password", base_url()))
        .bearer_auth(&token)
        .json(&json!({"password": format!("wrong-{password}")}))
        .send()
        .await
        .expect("Failed to attempt unlock");
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(false));

    // Correct password unlocks
    let resp = http
        .post(format!("{}/password", base_url()))
        .bearer_auth(&token)
        .json(&json!({"password": password}))
        .send()
        .await
        .expect("Failed to unlock");
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(true));

    // The same session now reads as unlocked
    let resp = http
        .get(format!("{}/password", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to check gate");
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(true));

    // A fresh session (no cookie) is still locked
    let resp = client()
        .get(format!("{}/password", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to check gate");
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(false));
}
