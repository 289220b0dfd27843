//! Logo gallery and upload API.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::services::logos::{LogoError, LogoService};
use crate::services::render::NO_LOGO;

use super::{ApiResult, err_json};

/// GET /api/logos – `["none", url, ...]`
pub async fn list_logos(State(state): State<SharedState>) -> ApiResult {
    let svc = LogoService::new(state.logos_dir(), state.db().clone());
    let keys = svc.list_keys().map_err(|e| {
        tracing::error!("Failed to read logo directory: {e}");
        err_json(500, "Failed to read logos")
    })?;

    let mut logos = Vec::with_capacity(keys.len() + 1);
    logos.push(Value::String(NO_LOGO.to_string()));
    logos.extend(
        keys.iter()
            .map(|key| Value::String(state.config().logo_url(key))),
    );
    Ok(Json(Value::Array(logos)))
}

/// POST /api/upload-logo – multipart field `logo`
pub async fn upload_logo(State(state): State<SharedState>, mut multipart: Multipart) -> ApiResult {
    let svc = LogoService::new(state.logos_dir(), state.db().clone());

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(e)),
        };
        if field.name() != Some("logo") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        let svc = svc.clone();
        let asset = tokio::task::spawn_blocking(move || svc.save_upload(&filename, &data))
            .await
            .map_err(|e| {
                tracing::error!("Logo upload task failed: {e}");
                err_json(500, "Failed to store logo")
            })?
            .map_err(|e| {
                let status = e.status_code();
                if status >= 500 {
                    tracing::error!("Logo upload failed: {e}");
                    err_json(status, "Failed to store logo")
                } else {
                    err_json(status, &e.to_string())
                }
            })?;

        return Ok(Json(json!({
            "url": state.config().logo_url(&asset.storage_key),
            "name": asset.original_name,
        })));
    }

    Err(err_json(400, "No logo file provided"))
}

/// Body-limit overruns surface here as 413; anything else is a malformed request.
fn multipart_error(e: MultipartError) -> (StatusCode, Json<Value>) {
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return err_json(status.as_u16(), &LogoError::FileTooLarge.to_string());
    }
    tracing::warn!("Rejected multipart upload: {}", e.body_text());
    err_json(status.as_u16(), &e.body_text())
}
