//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions with
//! strict security settings (SameSite=Strict, 24hr expiry). The session
//! carries only the logged-in seller's ID and the password-gate shop ID.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::BackendConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shopyard_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// # Arguments
///
/// * `pool` - `PostgreSQL` connection pool
/// * `config` - Backend configuration (for determining HTTPS mode)
///
/// # Panics
///
/// Panics if the schema name or table name is invalid (should never happen
/// with the hardcoded "public" and "session" values).
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &BackendConfig,
) -> SessionManagerLayer<PostgresStore> {
    // Create the PostgreSQL session store
    // Note: The session table must be created via migration.
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("public")
        .expect("valid schema name")
        .with_table_name("session")
        .expect("valid table name");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
