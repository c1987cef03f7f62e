//! HTTP API server.
//!
//! Exposes the summarization pipeline over REST:
//!
//! - `GET /api/health`
//! - `POST /api/process` with `{"url": "...", "language": "zh-CN"}`

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{ProcessOutcome, VideoProcessor};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared application state.
struct AppState {
    processor: Arc<VideoProcessor>,
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::warning(&e.to_string());
    }

    let processor = Arc::new(VideoProcessor::new(&settings)?);
    let app = build_router(processor);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Tubesum API Server");
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Health", "GET  /api/health");
    Output::kv("Process", "POST /api/process");
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router around a shared processor.
pub fn build_router(processor: Arc<VideoProcessor>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/process", post(process))
        .layer(cors)
        .with_state(Arc::new(AppState { processor }))
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ProcessRequest {
    /// YouTube URL or video ID
    url: String,
    /// Summary language
    #[serde(default = "default_language")]
    language: String,
}

fn default_language() -> String {
    "zh-CN".to_string()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Pipeline failures are reported in the body with HTTP 200.
async fn process(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProcessRequest>,
) -> impl IntoResponse {
    info!("Processing request: {} ({})", req.url, req.language);

    let outcome = ProcessOutcome::from_result(state.processor.process_video(&req.url, &req.language).await);
    if let ProcessOutcome::Error { message } = &outcome {
        warn!("Request failed: {}", message);
    }

    Json(outcome)
}
