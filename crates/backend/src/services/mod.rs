//! Business logic services for the backend.
//!
//! Services sit between the route handlers and the repositories: seller
//! account creation and password verification, the encrypted per-shop config
//! store, config payload validation, and scanning of on-disk shop data
//! directories.

pub mod config_store;
pub mod sellers;
pub mod shop_data;
pub mod validators;

pub use config_store::{ConfigCipher, ConfigStoreError, EncryptedConfigStore};
pub use sellers::{CreateSellerError, NewSeller, SellerService, verify_password};
pub use validators::validate_config;
