//! Inbound request schemas.
//!
//! Each route accepts one schema. Bodies are validated field by field so a
//! rejection can name every offending field at once, and defaults are filled
//! in here rather than during translation.

use super::error::{FieldError, ValidationError};
use super::format::{AudioFormat, Mp3Bitrate};
use super::request::{ProsodyParams, SchemaVariant, SynthesisRequest};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Bitrate used by the OpenAI-compatible schemas, which have no bitrate field
const COMPAT_MP3_BITRATE: Mp3Bitrate = Mp3Bitrate::Kbps64;

/// A request body shape that can be validated from raw JSON
pub trait SpeechSchema: Sized {
    fn parse(body: &Value) -> Result<Self, ValidationError>;
}

/// Native schema: `{text, reference_id, format?, mp3_bitrate?}`
#[derive(Debug, Clone, PartialEq)]
pub struct NativeSpeechRequest {
    pub text: String,
    pub reference_id: String,
    pub format: AudioFormat,
    pub mp3_bitrate: Mp3Bitrate,
}

impl SpeechSchema for NativeSpeechRequest {
    fn parse(body: &Value) -> Result<Self, ValidationError> {
        let mut fields = FieldReader::new(body)?;
        let text: Option<String> = fields.required("text");
        let reference_id: Option<String> = fields.required("reference_id");
        let format: Option<AudioFormat> = fields.optional("format");
        let mp3_bitrate: Option<Mp3Bitrate> = fields.optional("mp3_bitrate");

        fields.finish(|| {
            Some(Self {
                text: text?,
                reference_id: reference_id?,
                format: format.unwrap_or_default(),
                mp3_bitrate: mp3_bitrate.unwrap_or_default(),
            })
        })
    }
}

/// OpenAI-compatible schema: `{input, model, response_format?}`
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiSpeechRequest {
    pub input: String,
    pub model: String,
    pub response_format: AudioFormat,
}

impl SpeechSchema for OpenAiSpeechRequest {
    fn parse(body: &Value) -> Result<Self, ValidationError> {
        let mut fields = FieldReader::new(body)?;
        let input: Option<String> = fields.required("input");
        let model: Option<String> = fields.required("model");
        let response_format: Option<AudioFormat> = fields.optional("response_format");

        fields.finish(|| {
            Some(Self {
                input: input?,
                model: model?,
                response_format: response_format.unwrap_or_default(),
            })
        })
    }
}

/// Extended OpenAI-compatible schema with sampling, prosody and model override
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiSpeechRequestV2 {
    pub input: String,
    pub model: String,
    pub response_format: AudioFormat,
    pub prosody: ProsodyParams,
    pub base_model: Option<String>,
}

impl SpeechSchema for OpenAiSpeechRequestV2 {
    fn parse(body: &Value) -> Result<Self, ValidationError> {
        let defaults = ProsodyParams::default();

        let mut fields = FieldReader::new(body)?;
        let input: Option<String> = fields.required("input");
        let model: Option<String> = fields.required("model");
        let response_format: Option<AudioFormat> = fields.optional("response_format");
        let temperature: Option<f64> = fields.optional("temperature");
        let top_p: Option<f64> = fields.optional("top_p");
        let speed: Option<f64> = fields.optional("speed");
        let volume: Option<f64> = fields.optional("volume");
        let base_model: Option<String> = fields.optional("base_model");

        fields.finish(|| {
            Some(Self {
                input: input?,
                model: model?,
                response_format: response_format.unwrap_or_default(),
                prosody: ProsodyParams {
                    temperature: temperature.unwrap_or(defaults.temperature),
                    top_p: top_p.unwrap_or(defaults.top_p),
                    speed: speed.unwrap_or(defaults.speed),
                    volume: volume.unwrap_or(defaults.volume),
                },
                base_model,
            })
        })
    }
}

/// Closed set of accepted schemas, one per route
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechRequest {
    Native(NativeSpeechRequest),
    OpenAiV1(OpenAiSpeechRequest),
    OpenAiV2(OpenAiSpeechRequestV2),
}

impl SpeechRequest {
    /// Collapse any schema into the canonical record.
    ///
    /// `default_model` becomes the upstream model selector unless the
    /// schema carries its own override.
    pub fn resolve(self, default_model: &str) -> SynthesisRequest {
        match self {
            SpeechRequest::Native(req) => SynthesisRequest {
                variant: SchemaVariant::Native,
                text: req.text,
                voice_ref: req.reference_id,
                format: req.format,
                bitrate: Some(req.mp3_bitrate),
                prosody: None,
                model_header: default_model.to_string(),
            },
            SpeechRequest::OpenAiV1(req) => SynthesisRequest {
                variant: SchemaVariant::OpenAiV1,
                text: req.input,
                voice_ref: req.model,
                format: req.response_format,
                bitrate: compat_bitrate(req.response_format),
                prosody: None,
                model_header: default_model.to_string(),
            },
            SpeechRequest::OpenAiV2(req) => SynthesisRequest {
                variant: SchemaVariant::OpenAiV2,
                text: req.input,
                voice_ref: req.model,
                format: req.response_format,
                bitrate: compat_bitrate(req.response_format),
                prosody: Some(req.prosody),
                model_header: req
                    .base_model
                    .unwrap_or_else(|| default_model.to_string()),
            },
        }
    }
}

fn compat_bitrate(format: AudioFormat) -> Option<Mp3Bitrate> {
    (format == AudioFormat::Mp3).then_some(COMPAT_MP3_BITRATE)
}

/// Reads typed fields out of a JSON object, collecting every failure
struct FieldReader<'a> {
    body: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn new(body: &'a Value) -> Result<Self, ValidationError> {
        match body.as_object() {
            Some(body) => Ok(Self {
                body,
                errors: Vec::new(),
            }),
            None => Err(FieldError::body(
                "Input should be a valid dictionary or object",
                "model_attributes_type",
            )
            .into()),
        }
    }

    fn required<T: DeserializeOwned>(&mut self, field: &str) -> Option<T> {
        let body = self.body;
        match body.get(field) {
            Some(value) => self.decode(field, value),
            None => {
                self.errors.push(FieldError::missing(field));
                None
            }
        }
    }

    /// Absent and `null` both mean "use the default"
    fn optional<T: DeserializeOwned>(&mut self, field: &str) -> Option<T> {
        let body = self.body;
        match body.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.decode(field, value),
        }
    }

    fn decode<T: DeserializeOwned>(&mut self, field: &str, value: &Value) -> Option<T> {
        match T::deserialize(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                self.errors.push(FieldError::invalid(field, e.to_string()));
                None
            }
        }
    }

    fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationError> {
        if !self.errors.is_empty() {
            return Err(ValidationError::new(self.errors));
        }

        build().ok_or_else(|| {
            FieldError::body("Request body could not be assembled", "value_error").into()
        })
    }
}
