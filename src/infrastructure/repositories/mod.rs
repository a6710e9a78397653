pub mod fish_audio_repository;
pub mod speech_upstream;

pub use fish_audio_repository::{FishAudioRepository, DEFAULT_FISH_API_URL};
pub use speech_upstream::{
    AudioStream, SpeechUpstream, UpstreamError, UpstreamRequest, UpstreamResponse,
};
