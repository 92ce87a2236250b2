//! Network domain types.

use chrono::{DateTime, Utc};

use shopyard_core::NetworkId;

/// A network configuration row (domain type).
///
/// The `config` column holds an AES-encrypted JSON object; decrypt it through
/// the config store before use. At most one network is expected to be active
/// at a time, but nothing enforces that - callers take the first active match.
#[derive(Debug, Clone)]
pub struct Network {
    /// Unique network ID.
    pub id: NetworkId,
    /// Whether this network is the active one.
    pub active: bool,
    /// Encrypted JSON configuration blob.
    pub config: String,
    /// When the network was configured.
    pub created_at: DateTime<Utc>,
}
