//! Session-related types for authentication state.
//!
//! The session stores at most two values: the authenticated seller's ID and
//! the ID of a shop unlocked via the shop password gate. The two are
//! independent - unlocking a shop does not require (or imply) a seller login.

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for the logged-in seller's ID ([`shopyard_core::SellerId`]).
    pub const SELLER_ID: &str = "seller_id";

    /// Key for the shop ID unlocked via the shop password gate
    /// ([`shopyard_core::ShopId`]).
    pub const AUTHED_SHOP: &str = "authed_shop";
}
