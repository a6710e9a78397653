use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use fish_tts_proxy::controllers::speech::SpeechController;
use fish_tts_proxy::domain::speech::SpeechService;
use fish_tts_proxy::infrastructure::config::{Config, LogFormat};
use fish_tts_proxy::infrastructure::http::{build_router, start_http_server};
use fish_tts_proxy::infrastructure::repositories::FishAudioRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("failed to load configuration")?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Fish TTS proxy on {}:{}",
        config.host,
        config.port
    );

    match config.upstream_timeout {
        Some(timeout) => tracing::info!(
            upstream = %config.fish_api_url,
            timeout_secs = timeout.as_secs(),
            relay_mode = ?config.relay_mode,
            "Upstream configured"
        ),
        None => tracing::warn!(
            upstream = %config.fish_api_url,
            relay_mode = ?config.relay_mode,
            "Upstream configured without a timeout"
        ),
    }

    // === DEPENDENCY INJECTION SETUP ===
    let upstream = Arc::new(
        FishAudioRepository::new(
            config.fish_api_url.clone(),
            config.fish_api_key.clone(),
            config.upstream_timeout,
        )
        .context("failed to build upstream HTTP client")?,
    );
    let speech_service = Arc::new(SpeechService::new(upstream, config.relay_mode));
    let speech_controller = Arc::new(SpeechController::new(
        speech_service,
        config.default_model.clone(),
    ));

    let app = build_router(speech_controller, &config);
    start_http_server(&config, app).await
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fish_tts_proxy=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
