use crate::domain::speech::UpstreamPayload;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

/// Upstream response body: forward-only, consumed once
pub type AudioStream = BoxStream<'static, Result<Bytes, UpstreamError>>;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// No status was received (DNS, refused connection, TLS, ...)
    #[error("{0}")]
    Connection(String),
    #[error("{0}")]
    Timeout(String),
    /// The body broke off after the status was received
    #[error("{0}")]
    Body(String),
    #[error("failed to encode upstream payload: {0}")]
    Encode(String),
}

pub struct UpstreamRequest {
    pub payload: UpstreamPayload,
    /// Value of the `model` selector header
    pub model: String,
}

pub struct UpstreamResponse {
    pub status: u16,
    pub body: AudioStream,
}

/// Client for the speech synthesis provider.
///
/// Implementations send exactly one request per call and never retry. The
/// status is returned before any of the body is read so callers can refuse
/// to relay error bodies as audio.
#[async_trait]
pub trait SpeechUpstream: Send + Sync {
    /// Send a translated payload upstream
    ///
    /// # Errors
    /// Returns error if the payload cannot be encoded or no response status
    /// could be obtained
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}
