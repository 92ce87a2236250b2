//! Shop password gate route handlers.
//!
//! A shop may configure a single shared password (the `password` key of its
//! encrypted config). Unlocking it marks the *session* - not a seller - as
//! authed for that shop, so the gate works for storefront visitors with no
//! account at all.

use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;
use tower_sessions::Session;

use shopyard_core::ShopId;

use crate::error::AppError;
use crate::middleware::ShopAuth;
use crate::models::session_keys;
use crate::services::EncryptedConfigStore;
use crate::state::AppState;

use super::StatusResponse;

/// Config key holding the shop's shared password.
const PASSWORD_KEY: &str = "password";

/// Build the password gate router.
pub fn router() -> Router<AppState> {
    Router::new().route("/password", get(check_gate).post(unlock_gate))
}

/// Unlock attempt payload.
#[derive(Debug, Deserialize)]
pub struct PasswordAttempt {
    pub password: Option<String>,
}

/// Report whether this session has the shop unlocked.
///
/// GET /password
///
/// A shop without a configured password is always unlocked. Otherwise the
/// session must have previously unlocked this exact shop.
async fn check_gate(
    State(state): State<AppState>,
    ShopAuth(shop): ShopAuth,
    session: Session,
) -> Result<Json<StatusResponse>, AppError> {
    let store = EncryptedConfigStore::new(state.pool(), state.cipher());
    let configured = store
        .get(shop.id, PASSWORD_KEY)
        .await?
        .as_ref()
        .and_then(|v| v.as_str().map(str::to_owned))
        .filter(|s| !s.is_empty());

    if configured.is_none() {
        return Ok(Json(StatusResponse::OK));
    }

    let authed: Option<ShopId> = session.get(session_keys::AUTHED_SHOP).await?;

    Ok(Json(if authed == Some(shop.id) {
        StatusResponse::OK
    } else {
        StatusResponse::FAILED
    }))
}

/// Attempt to unlock the shop with the shared password.
///
/// POST /password
///
/// On a match the session's `authed_shop` is set to this shop's ID; any
/// other outcome is a plain `success: false`.
async fn unlock_gate(
    State(state): State<AppState>,
    ShopAuth(shop): ShopAuth,
    session: Session,
    Json(attempt): Json<PasswordAttempt>,
) -> Result<Json<StatusResponse>, AppError> {
    let store = EncryptedConfigStore::new(state.pool(), state.cipher());
    let stored = store
        .get(shop.id, PASSWORD_KEY)
        .await?
        .as_ref()
        .and_then(|v| v.as_str().map(str::to_owned));

    if stored == attempt.password {
        session.insert(session_keys::AUTHED_SHOP, shop.id).await?;
        Ok(Json(StatusResponse::OK))
    } else {
        Ok(Json(StatusResponse::FAILED))
    }
}
