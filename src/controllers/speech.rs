use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::{
    domain::speech::{
        AudioBody, NativeSpeechRequest, OpenAiSpeechRequest, OpenAiSpeechRequestV2,
        SpeechRequest, SpeechService, SpeechServiceApi, SynthesizedAudio,
    },
    error::AppResult,
    infrastructure::http::SpeechJson,
};

pub struct SpeechController {
    speech_service: Arc<SpeechService>,
    default_model: String,
}

impl SpeechController {
    pub fn new(speech_service: Arc<SpeechService>, default_model: String) -> Self {
        Self {
            speech_service,
            default_model,
        }
    }

    /// POST /tts/fishaudio/v1/ - native schema
    pub async fn synthesize_native(
        State(controller): State<Arc<SpeechController>>,
        SpeechJson(request): SpeechJson<NativeSpeechRequest>,
    ) -> AppResult<Response> {
        controller.synthesize(SpeechRequest::Native(request)).await
    }

    /// POST /v1/audio/speech - OpenAI-compatible schema
    pub async fn synthesize_openai(
        State(controller): State<Arc<SpeechController>>,
        SpeechJson(request): SpeechJson<OpenAiSpeechRequest>,
    ) -> AppResult<Response> {
        controller.synthesize(SpeechRequest::OpenAiV1(request)).await
    }

    /// POST /tts/fishaudio/v2/ - extended OpenAI-compatible schema
    pub async fn synthesize_openai_v2(
        State(controller): State<Arc<SpeechController>>,
        SpeechJson(request): SpeechJson<OpenAiSpeechRequestV2>,
    ) -> AppResult<Response> {
        controller.synthesize(SpeechRequest::OpenAiV2(request)).await
    }

    async fn synthesize(&self, request: SpeechRequest) -> AppResult<Response> {
        let request = request.resolve(&self.default_model);
        let audio = self.speech_service.synthesize(request).await?;
        Ok(audio_response(audio))
    }
}

/// Audio body with `audio/{format}` type, served as `output.{format}`
fn audio_response(audio: SynthesizedAudio) -> Response {
    let body = match audio.body {
        AudioBody::Buffered(bytes) => Body::from(bytes),
        // Dropping this body on client disconnect also drops the upstream stream
        AudioBody::Streaming(stream) => Body::from_stream(stream),
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, audio.format.content_type()),
            (header::CONTENT_DISPOSITION, audio.format.content_disposition()),
        ],
        body,
    )
        .into_response()
}
