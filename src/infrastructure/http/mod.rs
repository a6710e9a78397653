pub mod extract;
pub mod request_id;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::controllers::{health, speech::SpeechController};
use crate::infrastructure::config::Config;

pub use extract::SpeechJson;
pub use request_id::{request_id_middleware, X_REQUEST_ID};

/// Build the application router.
///
/// Each schema generation owns its own path so older callers keep working
/// as new schemas are added.
pub fn build_router(speech_controller: Arc<SpeechController>, config: &Config) -> Router {
    let speech_routes = Router::new()
        .route("/tts/fishaudio/v1/", post(SpeechController::synthesize_native))
        .route("/tts/fishaudio/v1", post(SpeechController::synthesize_native))
        .route("/v1/audio/speech", post(SpeechController::synthesize_openai))
        .route("/tts/fishaudio/v2/", post(SpeechController::synthesize_openai_v2))
        .route("/tts/fishaudio/v2", post(SpeechController::synthesize_openai_v2))
        .with_state(speech_controller);

    Router::new()
        .route("/health", get(health::health))
        .merge(speech_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_http_server(config: &Config, app: Router) -> anyhow::Result<()> {
    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
