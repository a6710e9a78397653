use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::speech::ValidationError;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Body could not be read at all; keeps the status the HTTP layer chose
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Upstream returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    #[error("Upstream unreachable: {0}")]
    Network(String),

    #[error("Upstream timed out: {0}")]
    Timeout(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body: `{"detail": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected { status, .. } => *status,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Network(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        match self {
            Self::Validation(err) => ErrorResponse {
                detail: serde_json::to_value(err.errors()).unwrap_or(Value::Null),
                upstream_status: None,
            },
            Self::Upstream { status, detail } => ErrorResponse {
                detail: Value::String(detail.clone()),
                upstream_status: Some(*status),
            },
            Self::Rejected { message, .. }
            | Self::Network(message)
            | Self::Timeout(message)
            | Self::Internal(message) => ErrorResponse {
                detail: Value::String(message.clone()),
                upstream_status: None,
            },
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::info!(
                error = %self,
                status = %status.as_u16(),
                "Request rejected"
            );
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
