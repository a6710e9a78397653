use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use crate::domain::speech::{FieldError, SpeechSchema, ValidationError};
use crate::error::AppError;

/// JSON body validated against one of the speech schemas.
///
/// Unlike `axum::Json`, every failure after the body is read is reported as a
/// 422 with field locations, and no content type is required.
pub struct SpeechJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for SpeechJson<T>
where
    S: Send + Sync,
    T: SpeechSchema + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;

        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            ValidationError::from(FieldError::body(
                format!("JSON decode error: {}", e),
                "json_invalid",
            ))
        })?;

        Ok(Self(T::parse(&value)?))
    }
}
