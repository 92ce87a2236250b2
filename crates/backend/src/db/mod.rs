//! Database operations for the backend `PostgreSQL` instance.
//!
//! ## Tables
//!
//! - `seller` - Seller accounts (email, argon2 password hash, superuser flag)
//! - `shop` - Tenant shops (auth token, hostname)
//! - `seller_shop` - Seller/shop associations carrying a role
//! - `network` - Network configurations (encrypted blob, active flag)
//! - `shop_config` - Per-shop encrypted key/value configuration
//! - `session` - tower-sessions storage
//!
//! Repositories are thin structs over a `PgPool` exposing named query methods
//! that return domain types; raw rows are converted via `TryFrom`, surfacing
//! invalid stored data as `RepositoryError::DataCorruption`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/backend/migrations/` and run via:
//! ```bash
//! cargo run -p shopyard-cli -- migrate
//! ```

pub mod networks;
pub mod sellers;
pub mod shop_config;
pub mod shops;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use networks::NetworkRepository;
pub use sellers::SellerRepository;
pub use shop_config::ShopConfigRepository;
pub use shops::ShopRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
