use super::error::SpeechServiceError;
use super::format::AudioFormat;
use super::payload::UpstreamPayload;
use super::request::SynthesisRequest;
use crate::infrastructure::repositories::{AudioStream, SpeechUpstream, UpstreamRequest};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};
use std::sync::Arc;

const UPSTREAM_OK: u16 = 200;

/// How audio is handed back to the caller once the upstream accepted the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    /// Collect the whole upstream body before responding. A failure at any
    /// point yields an error response and no audio bytes.
    Buffered,
    /// Forward chunks as they arrive. Opt-in: a failure after the first
    /// chunk can only truncate the already committed 200 response.
    Streaming,
}

pub enum AudioBody {
    Buffered(Bytes),
    Streaming(AudioStream),
}

pub struct SynthesizedAudio {
    pub format: AudioFormat,
    pub body: AudioBody,
}

pub struct SpeechService {
    upstream: Arc<dyn SpeechUpstream>,
    relay_mode: RelayMode,
}

impl SpeechService {
    pub fn new(upstream: Arc<dyn SpeechUpstream>, relay_mode: RelayMode) -> Self {
        Self {
            upstream,
            relay_mode,
        }
    }
}

#[async_trait]
pub trait SpeechServiceApi: Send + Sync {
    /// Synthesize a canonical request through the upstream provider
    ///
    /// This operation:
    /// - Translates the request into the provider payload
    /// - Sends it upstream with the resolved model selector
    /// - Turns any non-200 status into an upstream error carrying its body
    ///
    /// Returns the audio ready to relay, either buffered or as a live stream
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesizedAudio, SpeechServiceError>;
}

#[async_trait]
impl SpeechServiceApi for SpeechService {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesizedAudio, SpeechServiceError> {
        let payload = UpstreamPayload::from_request(&request);
        let format = payload.format();

        tracing::info!(
            variant = ?request.variant,
            model = %request.model_header,
            reference_id = %request.voice_ref,
            format = %format,
            text_length = request.text.len(),
            "Speech synthesis request"
        );

        let response = self
            .upstream
            .send(UpstreamRequest {
                payload,
                model: request.model_header,
            })
            .await?;

        if response.status != UPSTREAM_OK {
            // The status is the failure; a broken error body only degrades the detail
            let detail = match collect(response.body).await {
                Ok(body) => String::from_utf8_lossy(&body).into_owned(),
                Err(e) => e.to_string(),
            };

            tracing::warn!(
                upstream_status = response.status,
                detail = %detail,
                "Upstream rejected synthesis request"
            );

            return Err(SpeechServiceError::Upstream {
                status: response.status,
                detail,
            });
        }

        let body = match self.relay_mode {
            RelayMode::Buffered => {
                let audio = collect(response.body).await?;
                tracing::debug!(audio_size = audio.len(), "Upstream audio buffered");
                AudioBody::Buffered(audio)
            }
            RelayMode::Streaming => AudioBody::Streaming(commit_first_chunk(response.body).await?),
        };

        Ok(SynthesizedAudio { format, body })
    }
}

/// Drain a stream into one contiguous buffer
async fn collect(mut body: AudioStream) -> Result<Bytes, SpeechServiceError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = body.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(Bytes::from(buffer))
}

/// Wait for the first chunk so a transport failure before any audio still
/// surfaces as an error response, then hand back the full stream.
async fn commit_first_chunk(mut body: AudioStream) -> Result<AudioStream, SpeechServiceError> {
    match body.next().await {
        Some(first) => {
            let first = first?;
            Ok(stream::once(async move { Ok(first) }).chain(body).boxed())
        }
        None => Ok(stream::empty().boxed()),
    }
}
