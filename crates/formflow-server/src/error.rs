//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use formflow_model::ModelError;
use formflow_session::SessionError;
use serde::Serialize;
use thiserror::Error;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request has no session identifier. Always fatal.
    #[error("No session identifier on request")]
    MissingSession,

    /// Unknown page, form version or definition, or no model attached.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Deployment misconfiguration, not a user error.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Backing store or persistence hook failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SessionError> for ServerError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::MissingSession => ServerError::MissingSession,
            SessionError::UnknownStore(name) => {
                ServerError::InvalidConfiguration(format!("no session store named '{}'", name))
            }
            SessionError::Store(msg) => ServerError::Storage(msg),
            SessionError::Persistence(msg) => {
                ServerError::Storage(format!("persistence hook failed: {}", msg))
            }
            SessionError::Serialization(e) => ServerError::Serialization(e),
        }
    }
}

impl From<ModelError> for ServerError {
    fn from(e: ModelError) -> Self {
        let message = e.to_string();
        match e {
            e if e.is_not_found() => ServerError::NotFound(message),
            ModelError::MissingNotificationEmail(_) => ServerError::InvalidConfiguration(message),
            ModelError::Provider(msg) => ServerError::Storage(msg),
            _ => ServerError::Internal(message),
        }
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::MissingSession => (StatusCode::INTERNAL_SERVER_ERROR, "missing_session"),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ServerError::InvalidConfiguration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "invalid_configuration")
            }
            ServerError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            ServerError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "serialization_error")
            }
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, code, error = %message, "Server error");
        } else {
            tracing::warn!(status = %status, code, error = %message, "Client error");
        }

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formflow_types::FormStatus;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ServerError::MissingSession, StatusCode::INTERNAL_SERVER_ERROR),
            (ServerError::NotFound("page".into()), StatusCode::NOT_FOUND),
            (
                ServerError::InvalidConfiguration("prefix".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ServerError::Storage("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_model_not_found_maps_to_not_found() {
        let error: ServerError = ModelError::StatusNotFound {
            slug: "tax-form".into(),
            status: FormStatus::Live,
        }
        .into();
        assert!(matches!(error, ServerError::NotFound(_)));

        let error: ServerError = ModelError::MissingNotificationEmail("tax-form".into()).into();
        assert!(matches!(error, ServerError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_session_errors_map() {
        assert!(matches!(
            ServerError::from(SessionError::MissingSession),
            ServerError::MissingSession
        ));
        assert!(matches!(
            ServerError::from(SessionError::UnknownStore("redis".into())),
            ServerError::InvalidConfiguration(_)
        ));
    }
}
