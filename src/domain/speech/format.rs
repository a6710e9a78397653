use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio container requested from the provider and returned to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Pcm,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Pcm => "pcm",
        }
    }

    /// Value of the outbound `Content-Type` header
    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mp3",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Pcm => "audio/pcm",
        }
    }

    /// Value of the outbound `Content-Disposition` header
    pub fn content_disposition(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "attachment; filename=output.mp3",
            AudioFormat::Wav => "attachment; filename=output.wav",
            AudioFormat::Pcm => "attachment; filename=output.pcm",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MP3 bitrate in kbps, restricted to what the provider accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Mp3Bitrate {
    Kbps64,
    #[default]
    Kbps128,
    Kbps192,
}

impl Mp3Bitrate {
    pub fn kbps(&self) -> u16 {
        match self {
            Mp3Bitrate::Kbps64 => 64,
            Mp3Bitrate::Kbps128 => 128,
            Mp3Bitrate::Kbps192 => 192,
        }
    }
}

impl TryFrom<u16> for Mp3Bitrate {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            64 => Ok(Mp3Bitrate::Kbps64),
            128 => Ok(Mp3Bitrate::Kbps128),
            192 => Ok(Mp3Bitrate::Kbps192),
            other => Err(format!("Input should be 64, 128 or 192, got {}", other)),
        }
    }
}

impl From<Mp3Bitrate> for u16 {
    fn from(bitrate: Mp3Bitrate) -> Self {
        bitrate.kbps()
    }
}

/// Latency policy sent to the provider. Not caller-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Latency {
    Normal,
    Balanced,
}
