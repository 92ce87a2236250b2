//! Seller repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopyard_core::{Email, SellerId};

use super::RepositoryError;
use crate::models::Seller;

/// Internal row type for `PostgreSQL` seller queries.
#[derive(Debug, sqlx::FromRow)]
struct SellerRow {
    id: i32,
    name: String,
    email: String,
    password_hash: String,
    superuser: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<SellerRow> for Seller {
    type Error = RepositoryError;

    fn try_from(row: SellerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: SellerId::new(row.id),
            name: row.name,
            email,
            password_hash: row.password_hash,
            superuser: row.superuser,
            created_at: row.created_at,
        })
    }
}

/// Repository for seller database operations.
pub struct SellerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SellerRepository<'a> {
    /// Create a new seller repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count all sellers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seller")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Get a seller by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: SellerId) -> Result<Option<Seller>, RepositoryError> {
        let row = sqlx::query_as::<_, SellerRow>(
            r"
            SELECT id, name, email, password_hash, superuser, created_at
            FROM seller
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a seller by their exact email address (no case folding).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Seller>, RepositoryError> {
        let row = sqlx::query_as::<_, SellerRow>(
            r"
            SELECT id, name, email, password_hash, superuser, created_at
            FROM seller
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a superuser seller by email. Non-superuser rows never match.
    ///
    /// The caller is responsible for any case normalization; the lookup
    /// itself is exact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_superuser_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Seller>, RepositoryError> {
        let row = sqlx::query_as::<_, SellerRow>(
            r"
            SELECT id, name, email, password_hash, superuser, created_at
            FROM seller
            WHERE email = $1 AND superuser = TRUE
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Check whether any seller has the given exact email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM seller WHERE email = $1)")
                .bind(email)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Create a new seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        superuser: bool,
    ) -> Result<Seller, RepositoryError> {
        let row = sqlx::query_as::<_, SellerRow>(
            r"
            INSERT INTO seller (name, email, password_hash, superuser)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, superuser, created_at
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(superuser)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Delete a seller by their ID, returning the number of rows removed.
    ///
    /// Association rows cascade; the caller is responsible for clearing any
    /// session referencing the seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SellerId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM seller WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
