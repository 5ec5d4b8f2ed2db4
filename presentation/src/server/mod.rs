//! HTTP chat server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `POST` | `/chat` | Ask every provider, or save a shared conversation |
//! | `POST` | `/clear` | Forget the caller's conversation history |
//! | `GET`  | `/conversation/{id}` | Fetch a shared conversation |
//!
//! Sessions are identified by the `session_id` cookie; `/chat` mints one
//! when the request has none. Errors use
//! `{ "error": { "code": "...", "message": "..." } }`.

mod error;
mod handlers;
mod session;

pub use error::AppError;
pub use handlers::{ChatRequest, ChatResponse};
pub use session::{SESSION_COOKIE, SessionCookie};

use axum::{
    Router,
    routing::{get, post},
};
use chorus_application::{AskUseCase, Clock};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub ask: Arc<AskUseCase>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(ask: Arc<AskUseCase>, clock: Arc<dyn Clock>) -> Self {
        Self { ask, clock }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/chat", post(handlers::handle_chat))
        .route("/clear", post(handlers::handle_clear))
        .route("/conversation/{id}", get(handlers::handle_conversation))
        .layer(cors)
        .with_state(state)
}

/// Serve the chat API on `bind` until Ctrl-C.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(address = %bind, "Chat server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down chat server");
    }
}
