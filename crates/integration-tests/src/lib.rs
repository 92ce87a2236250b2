//! Integration tests for Shopyard.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and start the backend
//! cargo run -p shopyard-cli -- migrate
//! cargo run -p shopyard-backend
//!
//! # Run the (ignored-by-default) integration tests
//! cargo test -p shopyard-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - Registration, login/logout, email probe, superuser status
//! - `shop_access` - Shop-token gated endpoints (config, password gate)

/// Base URL for the backend API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SHOPYARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store, so the session cookie
/// survives across requests within one test.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique throwaway email for registration tests.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", uuid::Uuid::new_v4().simple())
}
