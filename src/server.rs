//! HTTP surface: an axum router over [`StoryGateway`].
//!
//! ```text
//! GET /api/v1/generate/story?prompt=…   → "story text"         (JSON string)
//! GET /api/v1/generate/images?story=…   → [{image_url, caption}]
//! GET /api/v1/generate/audio?text=…     → audio/wav attachment
//! GET /health                           → {"message": …}
//! *                                     → static frontend (optional)
//! ```
//!
//! Handlers are thin: extract the query, call the gateway, serialise. All
//! fatal errors go through `IntoResponse for GatewayError`, which logs the
//! full error and answers `500 {"detail": "<generic message>"}` so provider
//! detail never leaks to the browser.

use crate::error::GatewayError;
use crate::gateway::StoryGateway;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Filename offered to the browser for narration downloads.
pub const AUDIO_FILENAME: &str = "generated_story.wav";

// ── Config ───────────────────────────────────────────────────────────────

/// Listener and HTTP-layer settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind. Default: `0.0.0.0`.
    pub host: String,

    /// Port to bind. Default: 8000.
    pub port: u16,

    /// Directory served for every path not matched by the API, typically
    /// the built frontend. `None` → unmatched paths are 404.
    pub static_dir: Option<PathBuf>,

    /// Comma-separated allowed origins, or `*` for any.
    /// `None` → no cross-origin access.
    pub cors_allowed_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: None,
            cors_allowed_origins: Some("*".to_string()),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── State & queries ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<StoryGateway>,
}

#[derive(Debug, Deserialize)]
pub struct StoryQuery {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct ImagesQuery {
    pub story: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioQuery {
    pub text: String,
}

// ── Router ───────────────────────────────────────────────────────────────

/// Build the application router.
pub fn router(gateway: Arc<StoryGateway>, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/generate/story", get(generate_story))
        .route("/generate/images", get(generate_images))
        .route("/generate/audio", get(generate_audio));

    let mut app = Router::new()
        .nest("/api/v1", api)
        .route("/health", get(health));

    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors_layer(config.cors_allowed_origins.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { gateway })
}

fn cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(list) => {
            let origins: Vec<HeaderValue> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| match s.parse() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin '{}'", s);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::new(),
    }
}

/// Bind `config.address()` and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, gateway: Arc<StoryGateway>) -> std::io::Result<()> {
    let app = router(gateway, config);
    let listener = TcpListener::bind(config.address()).await?;
    let local: SocketAddr = listener.local_addr()?;
    info!("Listening on http://{}", local);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to story Generator !" }))
}

async fn generate_story(
    State(state): State<AppState>,
    Query(q): Query<StoryQuery>,
) -> Result<Json<String>, GatewayError> {
    let story = state.gateway.story(&q.prompt).await?;
    Ok(Json(story))
}

async fn generate_images(
    State(state): State<AppState>,
    Query(q): Query<ImagesQuery>,
) -> Result<Response, GatewayError> {
    let images = state.gateway.illustrate(&q.story).await?;
    Ok(Json(images).into_response())
}

async fn generate_audio(
    State(state): State<AppState>,
    Query(q): Query<AudioQuery>,
) -> Result<Response, GatewayError> {
    let wav = state.gateway.narrate(&q.text).await?;
    let disposition = format!("attachment; filename=\"{AUDIO_FILENAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        wav,
    )
        .into_response())
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error!("{}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": self.public_detail() })),
        )
            .into_response()
    }
}
