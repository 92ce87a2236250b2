//! Shop domain types.

use chrono::{DateTime, Utc};

use shopyard_core::ShopId;

/// A tenant shop (domain type).
///
/// Shops are read-only from this service's perspective; provisioning happens
/// elsewhere. The `auth_token` doubles as the name of the shop's data
/// directory under the configured cache path.
#[derive(Debug, Clone)]
pub struct Shop {
    /// Unique shop ID.
    pub id: ShopId,
    /// Shop display name.
    pub name: String,
    /// Opaque token identifying the shop to storefront clients and naming
    /// its local data directory.
    pub auth_token: String,
    /// Public hostname the shop is served from, if configured.
    pub hostname: Option<String>,
    /// When the shop was created.
    pub created_at: DateTime<Utc>,
}
