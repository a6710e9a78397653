use crate::domain::speech::RelayMode;
use crate::infrastructure::repositories::DEFAULT_FISH_API_URL;
use secrecy::SecretString;
use std::env;
use std::time::Duration;

pub const DEFAULT_TTS_MODEL: &str = "speech-1.6";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    // Upstream provider
    pub fish_api_key: SecretString,
    pub fish_api_url: String,
    pub default_model: String,
    /// `None` disables the timeout entirely
    pub upstream_timeout: Option<Duration>,
    pub relay_mode: RelayMode,
    // CORS, empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        // No fallback key: refuse to start rather than call the provider with a placeholder
        let fish_api_key = lookup("FISH_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing("FISH_API_KEY"))?;

        let port = var("PORT", "8080");
        let port = port.parse().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port,
        })?;

        let config = Config {
            host: var("HOST", "0.0.0.0"),
            port,
            log_format: match var("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            fish_api_key: SecretString::from(fish_api_key),
            fish_api_url: var("FISH_API_URL", DEFAULT_FISH_API_URL),
            default_model: var("FISH_TTS_MODEL", DEFAULT_TTS_MODEL),
            upstream_timeout: parse_timeout(lookup("UPSTREAM_TIMEOUT_SECS"))?,
            relay_mode: parse_relay_mode(lookup("RELAY_MODE"))?,
            cors_allowed_origins: parse_origins(&var("CORS_ALLOWED_ORIGINS", "*")),
        };

        Ok(config)
    }
}

fn parse_timeout(value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = value else {
        return Ok(Some(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS)));
    };

    match value.trim().to_lowercase().as_str() {
        "0" | "none" | "unbounded" => Ok(None),
        secs => secs
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_SECS",
                value,
            }),
    }
}

fn parse_relay_mode(value: Option<String>) -> Result<RelayMode, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("buffered") => Ok(RelayMode::Buffered),
        Some("streaming") => Ok(RelayMode::Streaming),
        Some(other) => Err(ConfigError::Invalid {
            name: "RELAY_MODE",
            value: other.to_string(),
        }),
    }
}

/// Any `*` entry allows every origin, which is represented as an empty list
fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.contains(&"*") {
        return Vec::new();
    }

    origins.into_iter().map(str::to_string).collect()
}
