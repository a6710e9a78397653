pub mod error;
pub mod format;
pub mod payload;
pub mod request;
pub mod schema;
pub mod service;

pub use error::{FieldError, SpeechServiceError, ValidationError};
pub use format::{AudioFormat, Latency, Mp3Bitrate};
pub use payload::UpstreamPayload;
pub use request::{ProsodyParams, SchemaVariant, SynthesisRequest};
pub use schema::{
    NativeSpeechRequest, OpenAiSpeechRequest, OpenAiSpeechRequestV2, SpeechRequest, SpeechSchema,
};
pub use service::{AudioBody, RelayMode, SpeechService, SpeechServiceApi, SynthesizedAudio};
