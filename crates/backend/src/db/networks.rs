//! Network repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopyard_core::NetworkId;

use super::RepositoryError;
use crate::models::Network;

/// Internal row type for `PostgreSQL` network queries.
#[derive(Debug, sqlx::FromRow)]
struct NetworkRow {
    id: i32,
    active: bool,
    config: String,
    created_at: DateTime<Utc>,
}

impl From<NetworkRow> for Network {
    fn from(row: NetworkRow) -> Self {
        Self {
            id: NetworkId::new(row.id),
            active: row.active,
            config: row.config,
            created_at: row.created_at,
        }
    }
}

/// Repository for network database operations.
pub struct NetworkRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NetworkRepository<'a> {
    /// Create a new network repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every configured network.
    ///
    /// Multiple rows may carry `active = TRUE`; callers resolve that by
    /// taking the first match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Network>, RepositoryError> {
        let rows = sqlx::query_as::<_, NetworkRow>(
            r"
            SELECT id, active, config, created_at
            FROM network
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
