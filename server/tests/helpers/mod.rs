//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::io::Cursor;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use base64::Engine;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use qrforge_lib::app::SharedState;
use qrforge_lib::config::AppConfig;
use qrforge_lib::server::router::create_router;

/// Router backed by a throwaway data directory.
pub struct TestApp {
    pub router: Router,
    pub state: SharedState,
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
    /// `name=value` part of the owner cookie, when one was set.
    pub cookie: Option<String>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        adjust(&mut config);

        let state = qrforge_lib::init_foundation(config).expect("Failed to init foundation");
        Self {
            router: create_router(state.clone()),
            state,
            _dir: dir,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    /// POST a single multipart file under the `logo` field.
    pub async fn upload(&self, filename: &str, data: &[u8], cookie: Option<&str>) -> TestResponse {
        let boundary = "qrforge-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"logo\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/upload-logo")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("userId="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string);

        let raw = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .unwrap()
            .to_vec();
        let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw,
            cookie,
        }
    }

    /// First request of a new visitor; returns the cookie it was given.
    pub async fn new_visitor(&self) -> String {
        self.request("GET", "/api/logos", None, None)
            .await
            .cookie
            .expect("No owner cookie issued")
    }

    pub async fn history(&self, cookie: &str) -> Vec<Value> {
        let res = self.request("POST", "/api/history", None, Some(cookie)).await;
        assert_eq!(res.status, StatusCode::OK);
        res.body.as_array().cloned().unwrap_or_default()
    }
}

/// Decode the payload of a base64 data URL.
pub fn decode_data_url(url: &str) -> (String, Vec<u8>) {
    let (meta, payload) = url.split_once(',').expect("Not a data URL");
    let mime = meta
        .trim_start_matches("data:")
        .trim_end_matches(";base64")
        .to_string();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .expect("Invalid base64");
    (mime, bytes)
}

/// A small solid PNG to use as a logo.
pub fn sample_png() -> Vec<u8> {
    solid_png(32, image::Rgba([220, 20, 60, 255]))
}

pub fn solid_png(side: u32, color: image::Rgba<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(side, side, color);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Base64 data URL for arbitrary bytes.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Decode the image of a successful generate response.
pub fn generated_image(res: &TestResponse) -> image::RgbaImage {
    assert_eq!(res.status, StatusCode::OK, "generate failed: {}", res.body);
    let (_, bytes) = decode_data_url(res.body["base64"].as_str().unwrap());
    image::load_from_memory(&bytes).unwrap().to_rgba8()
}
