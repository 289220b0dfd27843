use axum::extract::State;
use axum::{Extension, Json};
use serde_json::json;

use crate::app::SharedState;
use crate::identity::OwnerId;

use super::{ApiResult, err_json};

/// POST /api/history
pub async fn get_history(
    State(state): State<SharedState>,
    Extension(owner): Extension<OwnerId>,
) -> ApiResult {
    let limit = state.config().history_limit;
    let db = state.db().clone();
    let entries = tokio::task::spawn_blocking(move || db.list_active_history(owner.as_str(), limit))
        .await
        .map_err(|e| {
            tracing::error!("History task failed: {e}");
            err_json(500, "Database error")
        })?
        .map_err(|e| {
            tracing::error!("Failed to load history: {e}");
            err_json(500, "Database error")
        })?;

    Ok(Json(json!(entries)))
}

/// POST /api/clear-history
pub async fn clear_history(
    State(state): State<SharedState>,
    Extension(owner): Extension<OwnerId>,
) -> ApiResult {
    let db = state.db().clone();
    let owner_id = owner.as_str().to_string();
    let changed = tokio::task::spawn_blocking(move || db.deactivate_history(&owner_id))
        .await
        .map_err(|e| {
            tracing::error!("Clear-history task failed: {e}");
            err_json(500, "Failed to clear history")
        })?
        .map_err(|e| {
            tracing::error!("Failed to clear history: {e}");
            err_json(500, "Failed to clear history")
        })?;

    tracing::info!(owner = %owner.as_str(), changed, "History cleared");
    Ok(Json(json!({ "success": true, "changed": changed })))
}
