use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::security::DANGEROUS_COMMANDS;

use super::{AppState, ExecuteBody};

/// POST /api/execute — run a command through the gateway
///
/// A failed execution is a handled outcome, not a server error: the caller
/// gets `success: false` with the reason verbatim and must not retry.
pub(super) async fn handle_execute(
    State(state): State<AppState>,
    body: Result<Json<ExecuteBody>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let Json(ExecuteBody { command }) = match body {
        Ok(b) => b,
        Err(e) => {
            let err = serde_json::json!({
                "success": false,
                "error": format!("invalid request body: {e}. Expected: {{\"command\": \"...\"}}"),
                "timestamp": Utc::now().to_rfc3339(),
            });
            return (StatusCode::BAD_REQUEST, Json(err));
        }
    };

    match state.executor.execute(&command).await {
        Ok(record) => {
            // Audit failures must not fail the request
            if let Some(audit) = &state.audit {
                let _ = audit.log_execution(&command, &record.working_directory, 0);
            }

            let body = serde_json::json!({
                "success": true,
                "stdout": record.stdout,
                "stderr": record.stderr,
                "currentDirectory": record.working_directory.display().to_string(),
                "timestamp": record.timestamp.to_rfc3339(),
            });
            (StatusCode::OK, Json(body))
        }
        Err(e) => {
            let reason = e.to_string();
            if let Some(audit) = &state.audit {
                let _ = audit.log_rejection(&command, &reason);
            }

            let err = serde_json::json!({
                "success": false,
                "error": reason,
                "timestamp": Utc::now().to_rfc3339(),
            });
            (StatusCode::BAD_REQUEST, Json(err))
        }
    }
}

/// GET /api/current-directory — tracked working directory
pub(super) async fn handle_current_directory(State(state): State<AppState>) -> impl IntoResponse {
    let dir = state.executor.current_dir().await;

    Json(serde_json::json!({
        "success": true,
        "currentDirectory": dir.display().to_string(),
    }))
}

/// GET /api/dangerous-commands — the blocklist, for display only
pub(super) async fn handle_dangerous_commands() -> impl IntoResponse {
    Json(serde_json::json!({
        "success": true,
        "commands": DANGEROUS_COMMANDS,
    }))
}

/// GET /api/health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "success": true,
        "message": "service is running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
