mod handlers;

use handlers::{
    handle_current_directory, handle_dangerous_commands, handle_execute, handle_health,
};

use crate::audit::AuditLogger;
use crate::error::AppResult;
use crate::shell::ShellExecutor;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

/// Maximum request body size (64KB) — command strings are small
pub const MAX_BODY_SIZE: usize = 65_536;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<ShellExecutor>,
    pub audit: Option<Arc<AuditLogger>>,
}

/// Execute request body
#[derive(serde::Deserialize)]
pub struct ExecuteBody {
    pub command: String,
}

/// Build the gateway router
///
/// No request timeout layer: executions may legitimately run for minutes,
/// and the handler stays open until the command completes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/execute", post(handle_execute))
        .route("/api/current-directory", get(handle_current_directory))
        .route("/api/dangerous-commands", get(handle_dangerous_commands))
        .route("/api/health", get(handle_health))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}

/// Serve the gateway from a pre-bound listener
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> AppResult<()> {
    axum::serve(listener, router(state)).await?;

    Ok(())
}
