use crate::error::AppError;
use crate::infrastructure::repositories::UpstreamError;
use serde::Serialize;

/// A single failed field, located the way callers of OpenAI-style APIs expect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    pub fn missing(field: &str) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: "Field required".to_string(),
            kind: "missing",
        }
    }

    pub fn invalid(field: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            kind: "value_error",
        }
    }

    pub fn body(msg: impl Into<String>, kind: &'static str) -> Self {
        Self {
            loc: vec!["body".to_string()],
            msg: msg.into(),
            kind,
        }
    }
}

/// Request body failed schema validation. Never reaches the upstream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", format_fields(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl From<FieldError> for ValidationError {
    fn from(error: FieldError) -> Self {
        Self::new(vec![error])
    }
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.loc.join("."), e.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechServiceError {
    #[error("upstream returned {status}: {detail}")]
    Upstream { status: u16, detail: String },
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Internal(String),
}

impl From<UpstreamError> for SpeechServiceError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Connection(msg) | UpstreamError::Body(msg) => {
                SpeechServiceError::Network(msg)
            }
            UpstreamError::Timeout(msg) => SpeechServiceError::Timeout(msg),
            UpstreamError::Encode(msg) => SpeechServiceError::Internal(msg),
        }
    }
}

impl From<SpeechServiceError> for AppError {
    fn from(err: SpeechServiceError) -> Self {
        match err {
            SpeechServiceError::Upstream { status, detail } => AppError::Upstream { status, detail },
            SpeechServiceError::Network(msg) => AppError::Network(msg),
            SpeechServiceError::Timeout(msg) => AppError::Timeout(msg),
            SpeechServiceError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
