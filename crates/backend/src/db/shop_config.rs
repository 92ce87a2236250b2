//! Raw storage for the per-shop encrypted key/value config.
//!
//! Values stored here are opaque encrypted strings; encryption and decryption
//! happen in [`crate::services::config_store`]. Nothing in this module ever
//! sees plaintext.

use sqlx::PgPool;

use shopyard_core::ShopId;

use super::RepositoryError;

/// Repository for shop config rows.
pub struct ShopConfigRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopConfigRepository<'a> {
    /// Create a new shop config repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a single encrypted value by key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        shop_id: ShopId,
        key: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let value: Option<String> = sqlx::query_scalar(
            r"
            SELECT value
            FROM shop_config
            WHERE shop_id = $1 AND key = $2
            ",
        )
        .bind(shop_id)
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(value)
    }

    /// Fetch every encrypted key/value pair for a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn dump(&self, shop_id: ShopId) -> Result<Vec<(String, String)>, RepositoryError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r"
            SELECT key, value
            FROM shop_config
            WHERE shop_id = $1
            ORDER BY key
            ",
        )
        .bind(shop_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert or overwrite a single encrypted value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        shop_id: ShopId,
        key: &str,
        value: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO shop_config (shop_id, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (shop_id, key) DO UPDATE SET value = EXCLUDED.value
            ",
        )
        .bind(shop_id)
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
