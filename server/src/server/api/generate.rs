//! QR generation API.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use serde_json::json;

use crate::app::SharedState;
use crate::identity::OwnerId;
use crate::services::logos::LogoService;
use crate::services::render::{GenerateRequest, RenderService};

use super::{ApiResult, err_json};

/// POST /api/generate – `{ text, color?, size?, logo?, format? }`
pub async fn generate(
    State(state): State<SharedState>,
    Extension(owner): Extension<OwnerId>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload.map_err(|e| err_json(400, &e.body_text()))?;

    let logos = LogoService::new(state.logos_dir(), state.db().clone());
    let svc = RenderService::new(state.db().clone(), logos);

    let result = tokio::task::spawn_blocking(move || svc.generate(owner.as_str(), request))
        .await
        .map_err(|e| {
            tracing::error!("Render task failed: {e}");
            err_json(500, "QR generation failed")
        })?;

    match result {
        Ok(image) => Ok(Json(json!({
            "base64": image.data_url,
            "format": image.format,
            "mime": image.format.mime(),
        }))),
        Err(e) => {
            let status = e.status_code();
            if status >= 500 {
                tracing::error!("QR generation failed: {e}");
            }
            Err(err_json(status, &e.public_message()))
        }
    }
}
