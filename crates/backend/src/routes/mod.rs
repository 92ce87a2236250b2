//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Seller auth (session cookie)
//! GET    /auth                - Session status: email, role, associated shops
//! GET    /auth/{email}        - Email existence probe (204/404, rate limited)
//! POST   /auth/login          - Seller login (requires shop auth header)
//! POST   /auth/logout         - Destroy the session
//! POST   /auth/registration   - First-run superuser registration
//! DELETE /auth/registration   - Self-deletion of the logged-in seller
//!
//! # Superuser
//! GET  /superuser/auth        - Layered fleet status for the dashboard
//! POST /superuser/login       - Superuser login (case-folded email)
//!
//! # Shop config (seller+shop auth, admin role)
//! GET  /config                - Dump the shop's decrypted config
//! POST /config                - Validate and merge submitted config fields
//!
//! # Shop password gate (shop auth only)
//! GET  /password              - Is this session unlocked for the shop?
//! POST /password              - Attempt to unlock with the shared password
//! ```

pub mod auth;
pub mod config;
pub mod password;
pub mod superuser;

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(superuser::router())
        .merge(config::router())
        .merge(password::router())
}

/// Bare success/failure response body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
}

impl StatusResponse {
    pub(crate) const OK: Self = Self { success: true };
    pub(crate) const FAILED: Self = Self { success: false };
}

/// Success/failure response with a human-readable message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
