//! Seller authentication route handlers.
//!
//! Session status, login/logout, the email existence probe, first-run
//! registration, and self-deletion.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use shopyard_core::{Email, SellerId, ShopId, ShopRole};

use crate::db::{SellerRepository, ShopRepository};
use crate::error::AppError;
use crate::middleware::auth::resolve_shop_for_seller;
use crate::middleware::probe_rate_limiter;
use crate::models::{Shop, session_keys};
use crate::services::{CreateSellerError, NewSeller, SellerService, verify_password};
use crate::state::AppState;

use super::{MessageResponse, StatusResponse};

/// Build the seller auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth", get(auth_status))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/registration", post(register).delete(deregister))
        .merge(
            // The probe is unauthenticated, so it gets the strict limiter
            Router::new()
                .route("/auth/{email}", get(check_email))
                .layer(probe_rate_limiter()),
        )
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Login credentials.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A shop annotated with the requesting seller's role on it.
///
/// Deliberately a narrow projection (no timestamps); the superuser status
/// endpoint is the one that spreads full shop rows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopWithRole {
    pub id: ShopId,
    pub name: String,
    pub auth_token: String,
    pub hostname: Option<String>,
    pub role: ShopRole,
}

impl ShopWithRole {
    fn new(shop: Shop, role: ShopRole) -> Self {
        Self {
            id: shop.id,
            name: shop.name,
            auth_token: shop.auth_token,
            hostname: shop.hostname,
            role,
        }
    }
}

/// Body of a successful `GET /auth`.
#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub success: bool,
    pub email: Email,
    /// Shop-scoped role of the session. Empty for a non-superuser on this
    /// route, which carries no shop context.
    pub role: String,
    pub shops: Vec<ShopWithRole>,
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub email: Email,
    pub role: ShopRole,
}

/// Body of `DELETE /auth/registration`.
#[derive(Debug, Serialize)]
pub struct DestroyResponse {
    pub success: bool,
    /// Number of seller rows removed.
    pub destroy: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Report the session's seller, role, and associated shops.
///
/// GET /auth
async fn auth_status(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let Some(seller_id) = session.get(session_keys::SELLER_ID).await? else {
        return Ok(Json(StatusResponse::FAILED).into_response());
    };

    let sellers = SellerRepository::new(state.pool());
    let Some(seller) = sellers.get_by_id(seller_id).await? else {
        // The seller was deleted after this session was created
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::failed("Not logged in")),
        )
            .into_response());
    };

    let shops_repo = ShopRepository::new(state.pool());
    let (role, shops) = if seller.superuser {
        let shops = shops_repo
            .list_all()
            .await?
            .into_iter()
            .map(|shop| ShopWithRole::new(shop, ShopRole::Admin))
            .collect();
        (ShopRole::Admin.as_str().to_owned(), shops)
    } else {
        let shops = shops_repo
            .list_for_seller(seller.id)
            .await?
            .into_iter()
            .map(|(shop, role)| ShopWithRole::new(shop, role))
            .collect();
        (String::new(), shops)
    };

    Ok(Json(AuthStatusResponse {
        success: true,
        email: seller.email,
        role,
        shops,
    })
    .into_response())
}

/// Probe whether a seller account exists for an email.
///
/// GET /auth/{email}
///
/// 204 when a seller has that exact email, 404 otherwise. No body either
/// way. Unauthenticated, so it sits behind the strict per-IP rate limiter.
async fn check_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<StatusCode, AppError> {
    let exists = SellerRepository::new(state.pool())
        .exists_by_email(&email)
        .await?;

    Ok(if exists {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    })
}

/// Seller login.
///
/// POST /auth/login
///
/// The email lookup is exact (no case folding). Invalid email and invalid
/// password both answer 404, with distinct messages. On success the session
/// is established first, then the seller is resolved against the requesting
/// shop; a failure there rejects the request but leaves the session in place.
async fn login(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let sellers = SellerRepository::new(state.pool());
    let Some(seller) = sellers.get_by_email(&req.email).await? else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(MessageResponse::failed("Invalid email")),
        )
            .into_response());
    };

    if !verify_password(&req.password, &seller.password_hash) {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(MessageResponse::failed("Invalid password")),
        )
            .into_response());
    }

    session.insert(session_keys::SELLER_ID, seller.id).await?;

    let ctx = match resolve_shop_for_seller(&state, seller, &headers).await {
        Ok(ctx) => ctx,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    Ok(Json(LoginResponse {
        success: true,
        email: ctx.seller.email,
        role: ctx.role,
    })
    .into_response())
}

/// Destroy the session of a logged-in seller.
///
/// POST /auth/logout
///
/// `success` is `false` when there was nothing to log out - not an error.
async fn logout(session: Session) -> Result<Json<StatusResponse>, AppError> {
    let logged_in = session
        .get::<SellerId>(session_keys::SELLER_ID)
        .await?
        .is_some();

    if logged_in {
        session.flush().await?;
        Ok(Json(StatusResponse::OK))
    } else {
        Ok(Json(StatusResponse::FAILED))
    }
}

/// First-run registration of the bootstrap account.
///
/// POST /auth/registration
///
/// Only allowed while zero sellers exist; the account created here is always
/// a superuser and is logged in immediately.
async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(new_seller): Json<NewSeller>,
) -> Result<Response, AppError> {
    let service = SellerService::new(state.pool());

    if service.num_sellers().await? > 0 {
        return Ok((
            StatusCode::CONFLICT,
            Json(MessageResponse::failed(
                "An initial user has already been setup",
            )),
        )
            .into_response());
    }

    match service.create_seller(&new_seller, true).await {
        Ok(seller) => {
            session.insert(session_keys::SELLER_ID, seller.id).await?;
            Ok(Json(StatusResponse::OK).into_response())
        }
        Err(CreateSellerError::Repository(e)) => Err(AppError::Database(e)),
        Err(e) => Ok((
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::failed(e.to_string())),
        )
            .into_response()),
    }
}

/// Self-deletion of the logged-in seller.
///
/// DELETE /auth/registration
async fn deregister(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let Some(seller_id) = session
        .get::<SellerId>(session_keys::SELLER_ID)
        .await?
    else {
        return Ok((StatusCode::BAD_REQUEST, Json(StatusResponse::FAILED)).into_response());
    };

    let destroy = SellerRepository::new(state.pool()).delete(seller_id).await?;
    session.flush().await?;

    // success stays false here even after a successful delete; clients key
    // off the destroy count
    Ok(Json(DestroyResponse {
        success: false,
        destroy,
    })
    .into_response())
}
