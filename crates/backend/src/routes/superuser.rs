//! Superuser route handlers.
//!
//! Superuser login and the layered fleet-status report backing the
//! operations dashboard.

use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tower_sessions::Session;

use shopyard_core::{Email, SellerId, ShopId};

use crate::db::{NetworkRepository, SellerRepository, ShopRepository};
use crate::error::AppError;
use crate::models::{Network, Shop, session_keys};
use crate::services::config_store::ConfigCipher;
use crate::services::{shop_data, verify_password};
use crate::state::AppState;

use super::auth::LoginRequest;

/// Build the superuser router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/superuser/auth", get(superuser_status))
        .route("/superuser/login", post(superuser_login))
}

// =============================================================================
// Response Types
// =============================================================================

/// Machine-readable failure reasons for the superuser endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusReason {
    NoUsers,
    NotLoggedIn,
    NoSuchUser,
    NotSuperuser,
    NoActiveNetwork,
    NoShops,
    IncorrectPass,
}

/// A shop annotated with whether its data directory is viewable on disk.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopStatus {
    pub id: ShopId,
    pub name: String,
    pub auth_token: String,
    pub hostname: Option<String>,
    pub created_at: DateTime<Utc>,
    pub viewable: bool,
}

impl ShopStatus {
    fn new(shop: Shop, viewable: bool) -> Self {
        Self {
            id: shop.id,
            name: shop.name,
            auth_token: shop.auth_token,
            hostname: shop.hostname,
            created_at: shop.created_at,
            viewable,
        }
    }
}

/// Body of `GET /superuser/auth`.
///
/// The populated fields depend on how far down the precondition chain the
/// request made it; absent fields are omitted from the JSON entirely.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperuserStatusResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<StatusReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shops: Option<Vec<ShopStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_shops: Option<Vec<String>>,
}

impl SuperuserStatusResponse {
    /// A bare failure carrying only the reason.
    const fn failed(reason: StatusReason) -> Self {
        Self {
            success: false,
            reason: Some(reason),
            email: None,
            networks: None,
            network: None,
            shops: None,
            local_shops: None,
        }
    }
}

/// Body of a `POST /superuser/login` attempt.
#[derive(Debug, Serialize)]
pub struct SuperuserLoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<StatusReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Layered fleet status for the superuser dashboard.
///
/// GET /superuser/auth
///
/// Preconditions are checked strictly in order; the first unmet one
/// short-circuits the response. Later responses carry progressively more of
/// the fleet picture (networks, shops, orphaned local shop data).
async fn superuser_status(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SuperuserStatusResponse>, AppError> {
    let sellers = SellerRepository::new(state.pool());

    if sellers.count().await? == 0 {
        return Ok(Json(SuperuserStatusResponse::failed(StatusReason::NoUsers)));
    }

    let Some(seller_id) = session.get::<SellerId>(session_keys::SELLER_ID).await? else {
        return Ok(Json(SuperuserStatusResponse::failed(
            StatusReason::NotLoggedIn,
        )));
    };

    let Some(seller) = sellers.get_by_id(seller_id).await? else {
        return Ok(Json(SuperuserStatusResponse::failed(
            StatusReason::NoSuchUser,
        )));
    };

    if !seller.superuser {
        return Ok(Json(SuperuserStatusResponse::failed(
            StatusReason::NotSuperuser,
        )));
    }

    let network_rows = NetworkRepository::new(state.pool()).list_all().await?;
    let networks: Vec<Value> = network_rows
        .iter()
        .map(|n| network_snapshot(state.cipher(), n))
        .collect();

    // First active row wins; nothing guards against several being marked active
    let active = network_rows
        .iter()
        .position(|n| n.active)
        .and_then(|idx| networks.get(idx).cloned());

    let Some(network) = active else {
        return Ok(Json(SuperuserStatusResponse {
            networks: Some(networks),
            ..SuperuserStatusResponse::failed(StatusReason::NoActiveNetwork)
        }));
    };

    let shops = ShopRepository::new(state.pool()).list_newest_first().await?;
    let cache_dir = &state.config().shop_cache;

    let known_tokens: HashSet<&str> = shops.iter().map(|s| s.auth_token.as_str()).collect();
    let local_shops = shop_data::local_shops(cache_dir, &known_tokens);

    if shops.is_empty() {
        return Ok(Json(SuperuserStatusResponse {
            networks: Some(networks),
            network: Some(network),
            local_shops: Some(local_shops),
            ..SuperuserStatusResponse::failed(StatusReason::NoShops)
        }));
    }

    let shops = shops
        .into_iter()
        .map(|shop| {
            let viewable = shop_data::is_viewable(cache_dir, &shop.auth_token);
            ShopStatus::new(shop, viewable)
        })
        .collect();

    Ok(Json(SuperuserStatusResponse {
        success: true,
        reason: None,
        email: Some(seller.email),
        networks: Some(networks),
        network: Some(network),
        shops: Some(shops),
        local_shops: Some(local_shops),
    }))
}

/// Superuser login.
///
/// POST /superuser/login
///
/// The submitted email is case-folded before lookup and the lookup is
/// constrained to superuser rows. An unknown (or unparseable) email answers
/// 404; a wrong password answers 200 with `reason: "incorrect-pass"`.
async fn superuser_login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    // A malformed address cannot name a stored seller, so it falls into the
    // same 404 as an unknown one
    let email = match Email::parse(&req.email) {
        Ok(email) => email.normalized(),
        Err(_) => {
            return Ok((
                StatusCode::NOT_FOUND,
                Json(SuperuserLoginResponse {
                    success: false,
                    reason: Some(StatusReason::NoSuchUser),
                    email: None,
                    role: None,
                }),
            )
                .into_response());
        }
    };

    let Some(seller) = SellerRepository::new(state.pool())
        .get_superuser_by_email(email.as_str())
        .await?
    else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(SuperuserLoginResponse {
                success: false,
                reason: Some(StatusReason::NoSuchUser),
                email: None,
                role: None,
            }),
        )
            .into_response());
    };

    if verify_password(&req.password, &seller.password_hash) {
        session.insert(session_keys::SELLER_ID, seller.id).await?;

        Ok(Json(SuperuserLoginResponse {
            success: true,
            reason: None,
            email: Some(seller.email),
            role: Some("superuser"),
        })
        .into_response())
    } else {
        Ok(Json(SuperuserLoginResponse {
            success: false,
            reason: Some(StatusReason::IncorrectPass),
            email: None,
            role: None,
        })
        .into_response())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Merge a network row with its decrypted config into one flat object.
///
/// Row fields win over config fields on key collisions, and the raw `config`
/// blob never appears in the output. An undecryptable blob degrades to the
/// bare row fields.
fn network_snapshot(cipher: &ConfigCipher, network: &Network) -> Value {
    let mut merged = match cipher.decrypt_object(&network.config) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(
                network_id = %network.id,
                error = %e,
                "Failed to decrypt network config"
            );
            Map::new()
        }
    };

    merged.insert("id".to_owned(), Value::from(network.id.as_i32()));
    merged.insert("active".to_owned(), Value::from(network.active));
    merged.insert(
        "createdAt".to_owned(),
        Value::from(network.created_at.to_rfc3339()),
    );
    merged.remove("config");

    Value::Object(merged)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::ConfigKey;

    fn cipher() -> ConfigCipher {
        let key = ConfigKey::parse(
            "TEST_KEY",
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
        )
        .unwrap();
        ConfigCipher::new(&key)
    }

    fn network(active: bool, config: &Value) -> Network {
        Network {
            id: shopyard_core::NetworkId::new(1),
            active,
            config: cipher().encrypt_value(config).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_network_snapshot_merges_config() {
        let net = network(true, &json!({"provider": "mainnet", "ipfs": "https://ipfs.example"}));
        let snapshot = network_snapshot(&cipher(), &net);

        assert_eq!(snapshot["provider"], json!("mainnet"));
        assert_eq!(snapshot["active"], json!(true));
        assert_eq!(snapshot["id"], json!(1));
        assert!(snapshot.get("config").is_none());
    }

    #[test]
    fn test_network_snapshot_row_fields_win() {
        // A config blob claiming active=false cannot override the row
        let net = network(true, &json!({"active": false}));
        let snapshot = network_snapshot(&cipher(), &net);
        assert_eq!(snapshot["active"], json!(true));
    }

    #[test]
    fn test_network_snapshot_strips_nested_config_key() {
        let net = network(false, &json!({"config": {"leak": true}, "name": "testnet"}));
        let snapshot = network_snapshot(&cipher(), &net);
        assert!(snapshot.get("config").is_none());
        assert_eq!(snapshot["name"], json!("testnet"));
    }

    #[test]
    fn test_network_snapshot_survives_bad_blob() {
        let mut net = network(true, &json!({}));
        net.config = "enc1:not-base64!!".to_owned();
        let snapshot = network_snapshot(&cipher(), &net);
        assert_eq!(snapshot["id"], json!(1));
        assert_eq!(snapshot["active"], json!(true));
    }

    #[test]
    fn test_status_reason_wire_format() {
        assert_eq!(
            serde_json::to_string(&StatusReason::NoActiveNetwork).unwrap(),
            "\"no-active-network\""
        );
        assert_eq!(
            serde_json::to_string(&StatusReason::IncorrectPass).unwrap(),
            "\"incorrect-pass\""
        );
        assert_eq!(
            serde_json::to_string(&StatusReason::NoUsers).unwrap(),
            "\"no-users\""
        );
    }

    #[test]
    fn test_failed_response_omits_empty_fields() {
        let body =
            serde_json::to_value(SuperuserStatusResponse::failed(StatusReason::NoUsers)).unwrap();
        assert_eq!(body, json!({"success": false, "reason": "no-users"}));
    }
}
