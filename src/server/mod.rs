//! Axum HTTP server: the chat API under `/api/` plus the bundled page.
//!
//! ## URL layout
//!
//! ```text
//! GET  /              → conversation page
//! GET  /favicon.ico   → 204
//! GET  /api/health    → liveness + provider/model names (no provider call)
//! POST /api/chat      → multipart `messages` (+ ignored `files`) → {answer, sources}
//! ```
//!
//! `serve` drives the axum event loop until the [`CancellationToken`] fires,
//! then shuts down gracefully.

mod api;
mod ui;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::chat::ChatService;
use crate::error::AppError;

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone; all fields are reference-counted and read-only.
#[derive(Clone)]
pub struct AppState {
    /// Display name reported by `/api/health`.
    pub name: Arc<str>,
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(name: impl Into<Arc<str>>, chat: ChatService) -> Self {
        Self { name: name.into(), chat: Arc::new(chat) }
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router. `max_body_bytes` caps every request body,
/// multipart uploads included.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/chat", post(api::chat))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .route("/", get(ui::root))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

// ── Server loop ───────────────────────────────────────────────────────────────

/// Bind `bind_addr` and serve `router` until `shutdown` is cancelled.
pub async fn serve(bind_addr: &str, router: Router, shutdown: CancellationToken) -> Result<(), AppError> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {bind_addr}: {e}")))?;

    let local_addr = listener.local_addr()?;
    info!(%local_addr, "http server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("axum server error: {e}")))?;

    info!("http server shut down");
    Ok(())
}
