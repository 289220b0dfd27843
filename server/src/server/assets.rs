//! Embedded single-page UI and bundled default logos.

use std::borrow::Cow;

use axum::extract::OriginalUri;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;
use serde_json::json;

#[derive(Embed)]
#[folder = "../frontend/"]
struct UiAssets;

#[derive(Embed)]
#[folder = "assets/logos/"]
struct DefaultLogos;

/// Serve the UI index for bare `/` requests.
pub async fn index() -> Response {
    serve_embedded::<UiAssets>("index.html")
}

/// Fallback handler: serve UI assets for unmatched paths.
pub async fn fallback(uri: Uri) -> Response {
    let request_path = uri.path();
    if should_return_non_spa_not_found(request_path) {
        return json_not_found(request_path);
    }

    serve_embedded::<UiAssets>(request_path.trim_start_matches('/'))
}

/// JSON 404 for services mounted under a non-UI prefix, such as `/logos`.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    json_not_found(uri.path())
}

fn json_not_found(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(json!({
            "status": "error",
            "error": "Not Found",
            "path": path,
        })),
    )
        .into_response()
}

/// Bundled logos as `(file name, bytes)` pairs, for seeding the logo directory.
pub fn default_logos() -> impl Iterator<Item = (String, Cow<'static, [u8]>)> {
    DefaultLogos::iter().filter_map(|name| {
        let file = DefaultLogos::get(&name)?;
        Some((name.into_owned(), file.data))
    })
}

fn should_return_non_spa_not_found(path: &str) -> bool {
    const NON_SPA_PREFIXES: [&str; 3] = ["/api", "/logos", "/health"];

    NON_SPA_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn serve_embedded<E: Embed>(path: &str) -> Response {
    let (served, asset) = match E::get(path) {
        Some(asset) => (path, Some(asset)),
        None => ("index.html", E::get("index.html")),
    };

    match asset {
        Some(content) => {
            let mime = mime_guess::from_path(served).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
