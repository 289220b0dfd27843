use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::http::{HeaderValue, Method, header};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::{SetResponseHeader, SetResponseHeaderLayer};
use tower_http::trace::TraceLayer;

use crate::app::SharedState;
use crate::config::AppConfig;
use crate::identity;
use crate::services::logos::MAX_LOGO_SIZE;

use super::{api, assets};

const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Policy for the UI and API. Generated images arrive as `data:` URLs.
const APP_CSP: &str = "default-src 'self'; img-src * data: blob:; connect-src 'self' data:; \
     script-src 'self'; style-src 'self'; object-src 'none'; base-uri 'none'; frame-ancestors 'none'";

/// Uploaded files are passive images; scripts inside an SVG must never run.
const LOGO_CSP: &str = "default-src 'none'; style-src 'unsafe-inline'; sandbox";

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    let logos = SetResponseHeader::overriding(
        ServeDir::new(state.logos_dir()).not_found_service(assets::not_found.into_service()),
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(LOGO_CSP),
    );
    let cors = cors_layer(state.config());

    Router::new()
        // --- Core ---
        .route("/health", get(health_handler))
        // --- QR ---
        .route("/api/generate", post(api::generate::generate))
        // --- History ---
        .route("/api/history", post(api::history::get_history))
        .route("/api/clear-history", post(api::history::clear_history))
        // --- Logos ---
        .route("/api/logos", get(api::logos::list_logos))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .merge(build_upload_routes())
        .nest_service("/logos", logos)
        // --- UI at / ---
        .route("/", get(assets::index))
        .fallback(assets::fallback)
        // --- Middleware ---
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity::assign_owner,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(APP_CSP),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_upload_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/upload-logo", post(api::logos::upload_logo))
        .layer(DefaultBodyLimit::max(MAX_LOGO_SIZE + 64 * 1024))
}

/// Credentialed CORS for a configured UI origin, permissive otherwise.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let Some(origin) = config.cors_origin.as_deref() else {
        return CorsLayer::permissive();
    };
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!("Invalid CORS_ORIGIN {origin:?}: {e}; falling back to permissive CORS");
            CorsLayer::permissive()
        }
    }
}

async fn health_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "ok": true }))
}
