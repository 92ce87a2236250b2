//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::BackendConfig;
use crate::services::ConfigCipher;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool, configuration, and the config
/// value cipher.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BackendConfig,
    pool: PgPool,
    cipher: ConfigCipher,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: BackendConfig, pool: PgPool) -> Self {
        let cipher = ConfigCipher::new(&config.config_key);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                cipher,
            }),
        }
    }

    /// Get a reference to the backend configuration.
    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the config value cipher.
    #[must_use]
    pub fn cipher(&self) -> &ConfigCipher {
        &self.inner.cipher
    }
}
