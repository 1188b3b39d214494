//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use keyhub_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Handler error: an [`AppError`] on its way to becoming a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status for an error kind.
    pub fn status_for(kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Validation | ErrorKind::InvalidState => StatusCode::BAD_REQUEST,
            ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = Self::status_for(err.kind);

        let body = if err.is_client_error() || err.kind == ErrorKind::ExternalService {
            ApiErrorResponse {
                error: err.kind.to_string(),
                message: err.message.clone(),
            }
        } else {
            tracing::error!(kind = %err.kind, error = %err, source = ?err.source, "Internal server error");
            ApiErrorResponse {
                error: "INTERNAL".to_string(),
                message: "Internal server error".to_string(),
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::status_for(ErrorKind::InvalidState), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(ApiError::status_for(ErrorKind::ExternalService), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::status_for(ErrorKind::Database),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_message_is_hidden() {
        let response = ApiError::from(AppError::database("relation users missing")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body");
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body.error, "INTERNAL");
        assert!(!body.message.contains("users"));
    }

    #[tokio::test]
    async fn test_client_error_body() {
        let response = ApiError::from(AppError::validation("bad email")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body");
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body.error, "INVALID_INPUT");
        assert_eq!(body.message, "bad email");
    }
}
