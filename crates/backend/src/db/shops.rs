//! Shop repository for database operations.
//!
//! Shops and seller/shop associations are read-only here; provisioning and
//! role management live outside this service.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopyard_core::{SellerId, ShopId, ShopRole};

use super::RepositoryError;
use crate::models::Shop;

/// Internal row type for `PostgreSQL` shop queries.
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: i32,
    name: String,
    auth_token: String,
    hostname: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ShopRow> for Shop {
    fn from(row: ShopRow) -> Self {
        Self {
            id: ShopId::new(row.id),
            name: row.name,
            auth_token: row.auth_token,
            hostname: row.hostname,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for shop queries joined with the association role.
#[derive(Debug, sqlx::FromRow)]
struct ShopRoleRow {
    id: i32,
    name: String,
    auth_token: String,
    hostname: Option<String>,
    created_at: DateTime<Utc>,
    role: ShopRole,
}

impl From<ShopRoleRow> for (Shop, ShopRole) {
    fn from(row: ShopRoleRow) -> Self {
        (
            Shop {
                id: ShopId::new(row.id),
                name: row.name,
                auth_token: row.auth_token,
                hostname: row.hostname,
                created_at: row.created_at,
            },
            row.role,
        )
    }
}

/// Repository for shop database operations.
pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Shop>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopRow>(
            r"
            SELECT id, name, auth_token, hostname, created_at
            FROM shop
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List every shop, newest first (superuser dashboard ordering).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_newest_first(&self) -> Result<Vec<Shop>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopRow>(
            r"
            SELECT id, name, auth_token, hostname, created_at
            FROM shop
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List the shops a seller is associated with, each with the seller's
    /// role on that shop.
    ///
    /// Shops without an association row for this seller are not returned;
    /// superuser access is resolved above this layer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_seller(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<(Shop, ShopRole)>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopRoleRow>(
            r"
            SELECT s.id, s.name, s.auth_token, s.hostname, s.created_at, ss.role
            FROM shop s
            JOIN seller_shop ss ON ss.shop_id = s.id
            WHERE ss.seller_id = $1
            ",
        )
        .bind(seller_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a shop by its auth token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_auth_token(&self, token: &str) -> Result<Option<Shop>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(
            r"
            SELECT id, name, auth_token, hostname, created_at
            FROM shop
            WHERE auth_token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get the role a seller holds on a shop via the association table.
    ///
    /// Returns `None` when no association exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn role_for(
        &self,
        seller_id: SellerId,
        shop_id: ShopId,
    ) -> Result<Option<ShopRole>, RepositoryError> {
        let role: Option<ShopRole> = sqlx::query_scalar(
            r"
            SELECT role
            FROM seller_shop
            WHERE seller_id = $1 AND shop_id = $2
            ",
        )
        .bind(seller_id)
        .bind(shop_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(role)
    }
}
