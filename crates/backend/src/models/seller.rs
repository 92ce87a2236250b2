//! Seller domain types.

use chrono::{DateTime, Utc};

use shopyard_core::{Email, SellerId};

/// A seller account (domain type).
///
/// The password hash is an opaque argon2 encoding; it never leaves this
/// process and the type deliberately does not implement `Serialize`.
#[derive(Debug, Clone)]
pub struct Seller {
    /// Unique seller ID.
    pub id: SellerId,
    /// Seller's display name.
    pub name: String,
    /// Seller's email address, stored exactly as registered.
    pub email: Email,
    /// Argon2-encoded password hash (opaque).
    pub password_hash: String,
    /// Whether this seller holds implicit admin rights over every shop.
    pub superuser: bool,
    /// When the seller was created.
    pub created_at: DateTime<Utc>,
}
