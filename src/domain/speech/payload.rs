use super::format::{AudioFormat, Latency};
use super::request::{SchemaVariant, SynthesisRequest};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// Provider-side text chunking, fixed for every request
pub const CHUNK_LENGTH: u32 = 200;

/// Wire payload for the provider's `/v1/tts` endpoint.
///
/// Only built through [`UpstreamPayload::from_request`]; fields are private so
/// a payload cannot be altered once translated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamPayload {
    text: String,
    chunk_length: u32,
    format: AudioFormat,
    mp3_bitrate: Option<u16>,
    references: NoReferences,
    reference_id: String,
    normalize: bool,
    latency: Latency,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prosody: Option<Prosody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct Prosody {
    speed: f64,
    volume: f64,
}

/// Reference audio is never forwarded; always encodes as an empty list
#[derive(Debug, Clone, Copy, PartialEq)]
struct NoReferences;

impl Serialize for NoReferences {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_seq(Some(0))?.end()
    }
}

impl UpstreamPayload {
    /// Translate a canonical request. Pure and deterministic.
    pub fn from_request(request: &SynthesisRequest) -> Self {
        let mp3_bitrate = match request.format {
            AudioFormat::Mp3 => request.bitrate.map(|b| b.kbps()),
            AudioFormat::Wav | AudioFormat::Pcm => None,
        };

        let latency = match request.variant {
            SchemaVariant::Native => Latency::Normal,
            SchemaVariant::OpenAiV1 | SchemaVariant::OpenAiV2 => Latency::Balanced,
        };

        Self {
            text: request.text.clone(),
            chunk_length: CHUNK_LENGTH,
            format: request.format,
            mp3_bitrate,
            references: NoReferences,
            reference_id: request.voice_ref.clone(),
            normalize: true,
            latency,
            temperature: request.prosody.map(|p| p.temperature),
            top_p: request.prosody.map(|p| p.top_p),
            prosody: request.prosody.map(|p| Prosody {
                speed: p.speed,
                volume: p.volume,
            }),
        }
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn reference_id(&self) -> &str {
        &self.reference_id
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Encode as a MessagePack map with named keys
    pub fn to_msgpack(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec_named(self)
    }
}
