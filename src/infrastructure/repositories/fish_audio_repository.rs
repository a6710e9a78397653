use super::speech_upstream::{
    SpeechUpstream, UpstreamError, UpstreamRequest, UpstreamResponse,
};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use secrecy::{ExposeSecret, SecretString};
use std::error::Error as StdError;
use std::time::Duration;

pub const DEFAULT_FISH_API_URL: &str = "https://api.fish.audio/v1/tts";

const MSGPACK_CONTENT_TYPE: &str = "application/msgpack";

/// Fish Audio implementation of the speech upstream
pub struct FishAudioRepository {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl FishAudioRepository {
    /// `timeout` bounds the whole exchange including the audio body; `None`
    /// leaves it unbounded.
    pub fn new(
        endpoint: String,
        api_key: SecretString,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .tcp_nodelay(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl SpeechUpstream for FishAudioRepository {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let start_time = std::time::Instant::now();

        let body = request
            .payload
            .to_msgpack()
            .map_err(|e| UpstreamError::Encode(e.to_string()))?;

        tracing::info!(
            endpoint = %self.endpoint,
            model = %request.model,
            reference_id = %request.payload.reference_id(),
            format = %request.payload.format(),
            text_length = request.payload.text_len(),
            payload_size = body.len(),
            "Calling Fish Audio TTS API"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                "authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("content-type", MSGPACK_CONTENT_TYPE)
            .header("model", request.model.as_str())
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let err = request_error(e);
                tracing::error!(
                    error = %err,
                    model = %request.model,
                    "Fish Audio TTS API call failed"
                );
                err
            })?;

        let status = response.status().as_u16();
        tracing::info!(
            provider = "fish_audio",
            status = status,
            latency_ms = start_time.elapsed().as_millis(),
            "Fish Audio TTS API responded"
        );

        let body = response.bytes_stream().map_err(body_error).boxed();

        Ok(UpstreamResponse { status, body })
    }
}

fn request_error(err: reqwest::Error) -> UpstreamError {
    let message = error_chain(&err);
    if err.is_timeout() {
        UpstreamError::Timeout(message)
    } else {
        UpstreamError::Connection(message)
    }
}

fn body_error(err: reqwest::Error) -> UpstreamError {
    let message = error_chain(&err);
    if err.is_timeout() {
        UpstreamError::Timeout(message)
    } else {
        UpstreamError::Body(message)
    }
}

/// Render an error and its causes, skipping causes already in the message
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
