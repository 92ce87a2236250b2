//! Seller account service.
//!
//! Creation and credential checking for seller accounts. Password hashing is
//! delegated to argon2; the stored encoding is opaque to the rest of the
//! system.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use shopyard_core::Email;

use crate::db::{RepositoryError, SellerRepository};
use crate::models::Seller;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Payload for creating a seller account.
#[derive(Debug, Deserialize)]
pub struct NewSeller {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Errors that can occur when creating a seller.
#[derive(Debug, Error)]
pub enum CreateSellerError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shopyard_core::EmailError),

    /// Display name missing.
    #[error("name cannot be empty")]
    EmptyName,

    /// Password too weak or invalid.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// A seller with this email already exists.
    #[error("email is already registered")]
    EmailExists,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

/// Seller account service.
pub struct SellerService<'a> {
    sellers: SellerRepository<'a>,
}

impl<'a> SellerService<'a> {
    /// Create a new seller service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            sellers: SellerRepository::new(pool),
        }
    }

    /// Count existing seller accounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn num_sellers(&self) -> Result<i64, RepositoryError> {
        self.sellers.count().await
    }

    /// Create a seller account.
    ///
    /// Validates the email shape and password length, hashes the password
    /// with Argon2id, and stores the row. `superuser` is decided by the
    /// caller: the first-run registration route always passes `true`.
    ///
    /// # Errors
    ///
    /// Returns `CreateSellerError::InvalidEmail` / `EmptyName` /
    /// `WeakPassword` on validation failure, `EmailExists` on a duplicate,
    /// and `Repository` for other database errors.
    pub async fn create_seller(
        &self,
        new_seller: &NewSeller,
        superuser: bool,
    ) -> Result<Seller, CreateSellerError> {
        let email = Email::parse(new_seller.email.trim())?;

        let name = new_seller.name.trim();
        if name.is_empty() {
            return Err(CreateSellerError::EmptyName);
        }

        if new_seller.password.len() < MIN_PASSWORD_LENGTH {
            return Err(CreateSellerError::WeakPassword);
        }

        let password_hash = hash_password(&new_seller.password)?;

        let seller = self
            .sellers
            .create(name, &email, &password_hash, superuser)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CreateSellerError::EmailExists,
                other => CreateSellerError::Repository(other),
            })?;

        Ok(seller)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, CreateSellerError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CreateSellerError::PasswordHash)
}

/// Verify a password against a stored argon2 encoding.
///
/// Returns `false` for a mismatch or an unparseable stored hash; the login
/// flows only distinguish pass/fail.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same input").unwrap();
        let b = hash_password("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-an-argon2-encoding"));
    }
}
