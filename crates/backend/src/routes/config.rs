//! Shop configuration route handlers.
//!
//! Reading and writing a shop's encrypted configuration. Both directions
//! require a seller with the `admin` role on the requesting shop.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::{Map, Value};

use shopyard_core::ShopRole;

use crate::error::AppError;
use crate::middleware::{AuthRejection, SellerShopAuth};
use crate::services::{EncryptedConfigStore, validate_config};
use crate::state::AppState;

use super::{MessageResponse, StatusResponse};

/// Build the shop config router.
pub fn router() -> Router<AppState> {
    Router::new().route("/config", get(read_config).post(write_config))
}

/// Body of a successful `GET /config`.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub success: bool,
    pub config: Map<String, Value>,
}

/// Dump the shop's decrypted configuration.
///
/// GET /config
///
/// The shop row's `hostname` is merged into the config object so clients get
/// one flat map.
async fn read_config(
    State(state): State<AppState>,
    SellerShopAuth(ctx): SellerShopAuth,
) -> Result<Response, AppError> {
    if !ctx.permits(ShopRole::Admin) {
        return Ok(AuthRejection::Forbidden.into_response());
    }

    let store = EncryptedConfigStore::new(state.pool(), state.cipher());
    let mut config = store.dump(ctx.shop.id).await?;

    config.insert(
        "hostname".to_owned(),
        ctx.shop.hostname.clone().map_or(Value::Null, Value::from),
    );

    Ok(Json(ConfigResponse {
        success: true,
        config,
    })
    .into_response())
}

/// Validate and merge submitted config fields.
///
/// POST /config
///
/// The payload must be a JSON object matching the config schema; anything
/// else answers 400 without touching the store. Accepted fields are merged -
/// keys not present in the payload keep their stored values.
async fn write_config(
    State(state): State<AppState>,
    SellerShopAuth(ctx): SellerShopAuth,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    if !ctx.permits(ShopRole::Admin) {
        return Ok(AuthRejection::Forbidden.into_response());
    }

    let invalid = || {
        (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::failed("Invalid config data")),
        )
            .into_response()
    };

    let Value::Object(fields) = body else {
        return Ok(invalid());
    };

    if let Err(e) = validate_config(&fields) {
        tracing::debug!(shop_id = %ctx.shop.id, error = %e, "Rejected config payload");
        return Ok(invalid());
    }

    let store = EncryptedConfigStore::new(state.pool(), state.cipher());
    store.assign(ctx.shop.id, &fields).await?;

    Ok(Json(StatusResponse::OK).into_response())
}
