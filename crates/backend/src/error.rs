//! Unified error handling for the backend.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::ConfigStoreError;

/// Application-level error type for the backend.
///
/// Route handlers encode expected domain failures (bad credentials, missing
/// entities, validation rejects) directly in their JSON responses, and auth
/// failures travel as `AuthRejection`; this type only covers what escapes a
/// handler - datastore, config store, and session store failures. Every
/// variant is an unexpected server-side error, so they all map to 500.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Encrypted config store operation failed.
    #[error("Config store error: {0}")]
    ConfigStore(#[from] ConfigStoreError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Backend request error"
        );

        // Don't expose internal error details to clients
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "Internal server error" })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad row".to_string()));
        assert_eq!(err.to_string(), "Database error: data corruption: bad row");

        let err = AppError::ConfigStore(ConfigStoreError::Decrypt);
        assert_eq!(err.to_string(), "Config store error: config decryption failed");
    }

    #[test]
    fn test_app_error_maps_to_internal_server_error() {
        // Everything that escapes a handler is a server-side failure
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "test".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::ConfigStore(ConfigStoreError::Decrypt)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
