use super::format::{AudioFormat, Mp3Bitrate};

/// Which inbound schema a request arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    Native,
    OpenAiV1,
    OpenAiV2,
}

/// Sampling and prosody controls, only accepted by the extended schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProsodyParams {
    pub temperature: f64,
    pub top_p: f64,
    pub speed: f64,
    pub volume: f64,
}

impl Default for ProsodyParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.7,
            speed: 1.0,
            volume: 0.0,
        }
    }
}

/// Schema-independent synthesis request with every default resolved.
///
/// This is the only input the payload translator accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub variant: SchemaVariant,
    pub text: String,
    pub voice_ref: String,
    pub format: AudioFormat,
    pub bitrate: Option<Mp3Bitrate>,
    pub prosody: Option<ProsodyParams>,
    pub model_header: String,
}
