//! Auth resolution middleware and extractors.
//!
//! Authorization is an explicit pipeline of resolution steps (shop auth,
//! seller+shop auth, role gate). Each step either returns a populated context
//! or a terminal [`AuthRejection`]; extractors wrap the steps for use in
//! route handlers, and the login flow calls them directly so its credential
//! check runs before shop resolution.
//!
//! Shops authenticate with `Authorization: Bearer <auth token>`; sellers
//! authenticate via the session cookie's `seller_id`. The two are combined
//! into a [`SellerShopContext`] carrying the resolved role: a superuser is
//! `admin` on every shop, anyone else needs an association row.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use shopyard_core::{SellerId, ShopRole};

use crate::db::{RepositoryError, SellerRepository, ShopRepository};
use crate::models::{Seller, Shop, session_keys};
use crate::state::AppState;

/// Seller + shop context with the resolved role.
#[derive(Debug, Clone)]
pub struct SellerShopContext {
    pub seller: Seller,
    pub shop: Shop,
    pub role: ShopRole,
}

impl SellerShopContext {
    /// Whether this context satisfies a role requirement.
    ///
    /// `admin` passes every gate; other roles only pass their own.
    #[must_use]
    pub fn permits(&self, required: ShopRole) -> bool {
        self.role == ShopRole::Admin || self.role == required
    }
}

/// Terminal failure of an auth resolution step.
#[derive(Debug)]
pub enum AuthRejection {
    /// Shop auth token missing or unknown.
    Unauthorized,
    /// No usable seller session.
    NotLoggedIn,
    /// Seller has no (sufficient) role on the shop.
    Forbidden,
    /// Session or datastore failure during resolution.
    Internal(String),
}

impl From<RepositoryError> for AuthRejection {
    fn from(e: RepositoryError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<tower_sessions::session::Error> for AuthRejection {
    fn from(e: tower_sessions::session::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::NotLoggedIn => (StatusCode::UNAUTHORIZED, "Not logged in"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "Auth resolution failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

// =============================================================================
// Resolution Steps
// =============================================================================

/// Extract the shop auth token from the Authorization header.
///
/// Accepts the token bare or with a (case-insensitive) `Bearer ` prefix.
#[must_use]
pub fn shop_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if raw.eq_ignore_ascii_case("bearer") => "",
        _ => raw,
    };

    (!token.is_empty()).then_some(token)
}

/// Resolve the requesting shop from the Authorization header.
///
/// # Errors
///
/// Returns `AuthRejection::Unauthorized` when the token is missing or
/// matches no shop.
pub async fn resolve_shop(state: &AppState, headers: &HeaderMap) -> Result<Shop, AuthRejection> {
    let token = shop_token(headers).ok_or(AuthRejection::Unauthorized)?;

    ShopRepository::new(state.pool())
        .get_by_auth_token(token)
        .await?
        .ok_or(AuthRejection::Unauthorized)
}

/// Read the logged-in seller's ID from the session, if any.
///
/// # Errors
///
/// Returns `AuthRejection::Internal` if the session store fails.
pub async fn session_seller_id(session: &Session) -> Result<Option<SellerId>, AuthRejection> {
    Ok(session.get::<SellerId>(session_keys::SELLER_ID).await?)
}

/// Resolve the logged-in seller from the session.
///
/// A session naming a seller that no longer exists is treated the same as no
/// session at all - stale cookies grant nothing.
///
/// # Errors
///
/// Returns `AuthRejection::NotLoggedIn` when there is no usable session.
pub async fn resolve_seller(state: &AppState, session: &Session) -> Result<Seller, AuthRejection> {
    let seller_id = session_seller_id(session)
        .await?
        .ok_or(AuthRejection::NotLoggedIn)?;

    SellerRepository::new(state.pool())
        .get_by_id(seller_id)
        .await?
        .ok_or(AuthRejection::NotLoggedIn)
}

/// Resolve the role a seller holds on a shop.
///
/// Superusers are `admin` everywhere; everyone else gets their association
/// role, or nothing.
#[must_use]
pub fn resolve_role(seller: &Seller, association: Option<ShopRole>) -> Option<ShopRole> {
    if seller.superuser {
        Some(ShopRole::Admin)
    } else {
        association
    }
}

/// Combine an already-resolved seller with the requesting shop.
///
/// Used by the login flow, where the seller comes from the credential check
/// rather than the session.
///
/// # Errors
///
/// Returns `AuthRejection::Unauthorized` for shop resolution failures and
/// `AuthRejection::Forbidden` when the seller has no role on the shop.
pub async fn resolve_shop_for_seller(
    state: &AppState,
    seller: Seller,
    headers: &HeaderMap,
) -> Result<SellerShopContext, AuthRejection> {
    let shop = resolve_shop(state, headers).await?;

    let association = ShopRepository::new(state.pool())
        .role_for(seller.id, shop.id)
        .await?;

    let role = resolve_role(&seller, association).ok_or(AuthRejection::Forbidden)?;

    Ok(SellerShopContext { seller, shop, role })
}

/// Resolve seller, shop, and role for the current request.
///
/// # Errors
///
/// Returns the rejection of whichever step fails first.
pub async fn resolve_seller_and_shop(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
) -> Result<SellerShopContext, AuthRejection> {
    let seller = resolve_seller(state, session).await?;
    resolve_shop_for_seller(state, seller, headers).await
}

// =============================================================================
// Extractors
// =============================================================================

/// Extractor that resolves the requesting shop from its auth token.
pub struct ShopAuth(pub Shop);

impl<S> FromRequestParts<S> for ShopAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let shop = resolve_shop(&state, &parts.headers).await?;
        Ok(Self(shop))
    }
}

/// Extractor that requires a logged-in seller with a role on the requesting
/// shop.
pub struct SellerShopAuth(pub SellerShopContext);

impl<S> FromRequestParts<S> for SellerShopAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::NotLoggedIn)?
            .clone();

        let ctx = resolve_seller_and_shop(&state, &session, &parts.headers).await?;
        Ok(Self(ctx))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Utc;

    use shopyard_core::{Email, SellerId};

    use super::*;

    fn seller(superuser: bool) -> Seller {
        Seller {
            id: SellerId::new(1),
            name: "Test Seller".to_owned(),
            email: Email::parse("seller@example.com").unwrap(),
            password_hash: "$argon2id$opaque".to_owned(),
            superuser,
            created_at: Utc::now(),
        }
    }

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_shop_token_bearer_prefix() {
        let headers = headers_with_auth("Bearer tok-123");
        assert_eq!(shop_token(&headers), Some("tok-123"));
    }

    #[test]
    fn test_shop_token_lowercase_scheme() {
        let headers = headers_with_auth("bearer tok-123");
        assert_eq!(shop_token(&headers), Some("tok-123"));
    }

    #[test]
    fn test_shop_token_bare() {
        let headers = headers_with_auth("tok-123");
        assert_eq!(shop_token(&headers), Some("tok-123"));
    }

    #[test]
    fn test_shop_token_missing_header() {
        assert_eq!(shop_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_shop_token_empty_bearer() {
        let headers = headers_with_auth("Bearer ");
        assert_eq!(shop_token(&headers), None);
    }

    #[test]
    fn test_resolve_role_superuser_ignores_association() {
        assert_eq!(
            resolve_role(&seller(true), None),
            Some(ShopRole::Admin)
        );
        assert_eq!(
            resolve_role(&seller(true), Some(ShopRole::Staff)),
            Some(ShopRole::Admin)
        );
    }

    #[test]
    fn test_resolve_role_regular_seller() {
        assert_eq!(resolve_role(&seller(false), None), None);
        assert_eq!(
            resolve_role(&seller(false), Some(ShopRole::Staff)),
            Some(ShopRole::Staff)
        );
    }

    #[test]
    fn test_permits_admin_passes_everything() {
        let ctx = SellerShopContext {
            seller: seller(false),
            shop: Shop {
                id: shopyard_core::ShopId::new(1),
                name: "Shop".to_owned(),
                auth_token: "tok".to_owned(),
                hostname: None,
                created_at: Utc::now(),
            },
            role: ShopRole::Admin,
        };
        assert!(ctx.permits(ShopRole::Admin));
        assert!(ctx.permits(ShopRole::Staff));
    }

    #[test]
    fn test_permits_staff_is_not_admin() {
        let ctx = SellerShopContext {
            seller: seller(false),
            shop: Shop {
                id: shopyard_core::ShopId::new(1),
                name: "Shop".to_owned(),
                auth_token: "tok".to_owned(),
                hostname: None,
                created_at: Utc::now(),
            },
            role: ShopRole::Staff,
        };
        assert!(!ctx.permits(ShopRole::Admin));
        assert!(ctx.permits(ShopRole::Staff));
    }
}
