//! QR generation pipeline: validate, encode, composite a logo, record history.

use history_db::Database;
use image::Rgba;
use qr_engine::{EcLevel, LOGO_SCALE, LogoKind, RenderError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::logos::{LogoError, LogoService};

pub const MIN_SIZE: u32 = 64;
pub const MAX_SIZE: u32 = 1024;
pub const DEFAULT_SIZE: u32 = 256;
pub const DEFAULT_COLOR: &str = "#000000";
/// Logo value meaning "no logo".
pub const NO_LOGO: &str = "none";

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{0}")]
    Validation(String),
    #[error("Logo not found")]
    LogoNotFound(String),
    #[error(transparent)]
    Logo(#[from] LogoError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Database error: {0}")]
    Db(#[from] history_db::DbError),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl GenerateError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Render(RenderError::DataTooLong) => 400,
            Self::Logo(e) if e.is_client_error() => 400,
            _ => 500,
        }
    }

    /// Message safe to return to the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Render(RenderError::DataTooLong) => RenderError::DataTooLong.to_string(),
            Self::Logo(e) if e.is_client_error() => e.to_string(),
            Self::LogoNotFound(_) => "Logo not found".to_string(),
            _ => "QR generation failed".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

/// Body of `POST /api/generate`. `text` stays untyped so a non-string is a validation error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub text: Option<Value>,
    pub color: Option<String>,
    pub size: Option<u32>,
    pub logo: Option<String>,
    pub format: Option<String>,
}

/// Render options as stored in a history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub color: String,
    pub size: u32,
    pub logo: Option<String>,
    pub format: OutputFormat,
}

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub data_url: String,
    pub format: OutputFormat,
}

impl GenerateRequest {
    /// Check the request and fill in defaults.
    pub fn validate(self) -> Result<(String, GenerationParams), GenerateError> {
        let text = match self.text {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => return Err(GenerateError::Validation("Invalid text".into())),
        };

        let color = self
            .color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_COLOR.to_string());
        qr_engine::parse_hex_color(&color)
            .map_err(|_| GenerateError::Validation(format!("Invalid color: {color}")))?;

        let size = self.size.unwrap_or(DEFAULT_SIZE);
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GenerateError::Validation(format!(
                "Size must be between {MIN_SIZE} and {MAX_SIZE}"
            )));
        }

        let format = match self.format.as_deref() {
            None | Some("") => OutputFormat::default(),
            Some(f) => OutputFormat::parse(f)
                .ok_or_else(|| GenerateError::Validation(format!("Unsupported format: {f}")))?,
        };

        let logo = self
            .logo
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty() && l != NO_LOGO);

        Ok((
            text,
            GenerationParams {
                color,
                size,
                logo,
                format,
            },
        ))
    }
}

#[derive(Clone)]
pub struct RenderService {
    db: Database,
    logos: LogoService,
}

impl RenderService {
    pub fn new(db: Database, logos: LogoService) -> Self {
        Self { db, logos }
    }

    /// Run the whole pipeline. Nothing is recorded unless the image is produced.
    pub fn generate(&self, owner_id: &str, request: GenerateRequest) -> Result<GeneratedImage, GenerateError> {
        let (text, params) = request.validate()?;
        let data_url = self.render(&text, &params)?;

        let params_json = serde_json::to_string(&params)?;
        let history_id = self.db.record_history(
            owner_id,
            &text,
            &super::timestamp_now(),
            &params_json,
        )?;

        tracing::info!(
            owner = %owner_id,
            size = params.size,
            format = ?params.format,
            history_id,
            has_logo = params.logo.is_some(),
            "QR generated"
        );
        Ok(GeneratedImage {
            data_url,
            format: params.format,
        })
    }

    /// Render without touching history.
    pub fn render(&self, text: &str, params: &GenerationParams) -> Result<String, GenerateError> {
        let dark = qr_engine::parse_hex_color(&params.color)?;
        let logo = params
            .logo
            .as_deref()
            .map(|reference| self.resolve_logo(reference))
            .transpose()?;

        // Stronger correction leaves room for the area the logo covers.
        let ec_level = if logo.is_some() { EcLevel::H } else { EcLevel::M };
        let matrix = qr_engine::encode(text, ec_level)?;
        let placement = qr_engine::logo_placement(params.size, LOGO_SCALE);

        let logo_img = logo
            .map(|(kind, bytes)| qr_engine::load_logo(kind, &bytes, placement.size))
            .transpose()?;

        match params.format {
            OutputFormat::Png => {
                let raster = qr_engine::render_raster(&matrix, params.size, dark, BACKGROUND)?;
                let out = match &logo_img {
                    Some(img) => qr_engine::composite(&raster, img, LOGO_SCALE).0,
                    None => raster,
                };
                let png = qr_engine::encode_png(&out)?;
                Ok(qr_engine::encode_data_url(OutputFormat::Png.mime(), &png))
            }
            OutputFormat::Svg => {
                let href = logo_img
                    .map(|img| {
                        let fitted = img
                            .resize_exact(placement.size, placement.size, image::imageops::FilterType::Lanczos3)
                            .to_rgba8();
                        qr_engine::encode_png(&fitted)
                            .map(|png| qr_engine::encode_data_url("image/png", &png))
                    })
                    .transpose()?;
                let svg = qr_engine::render_svg(
                    &matrix,
                    params.size,
                    dark,
                    BACKGROUND,
                    href.as_deref().map(|h| (h, placement)),
                )?;
                Ok(qr_engine::encode_data_url(OutputFormat::Svg.mime(), svg.as_bytes()))
            }
        }
    }

    /// Inline data URL, or a reference to a stored logo file.
    fn resolve_logo(&self, reference: &str) -> Result<(LogoKind, Vec<u8>), GenerateError> {
        if reference.starts_with("data:") {
            let data = qr_engine::parse_data_url(reference)?;
            let kind = LogoKind::from_mime(&data.mime).ok_or_else(|| {
                GenerateError::Validation(format!("Unsupported logo type: {}", data.mime))
            })?;
            return Ok((kind, data.bytes));
        }

        self.logos.read_reference(reference).map_err(|e| match e {
            LogoError::NotFound(key) => GenerateError::LogoNotFound(key),
            other => GenerateError::Logo(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> GenerateRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn defaults_are_filled_in() {
        let (text, params) = request(json!({ "text": "hello" })).validate().unwrap();
        assert_eq!(text, "hello");
        assert_eq!(
            params,
            GenerationParams {
                color: "#000000".into(),
                size: 256,
                logo: None,
                format: OutputFormat::Png,
            }
        );
    }

    #[test]
    fn none_logo_is_normalized() {
        for logo in [json!("none"), json!(""), Value::Null] {
            let (_, params) = request(json!({ "text": "a", "logo": logo })).validate().unwrap();
            assert_eq!(params.logo, None);
        }
    }

    #[test]
    fn text_must_be_non_empty_string() {
        for text in [json!(""), json!(42), json!(null), json!(["a"])] {
            let err = request(json!({ "text": text })).validate().unwrap_err();
            assert_eq!(err.status_code(), 400);
        }
        let err = request(json!({})).validate().unwrap_err();
        assert_eq!(err.public_message(), "Invalid text");
    }

    #[test]
    fn size_color_and_format_are_checked() {
        assert!(request(json!({ "text": "a", "size": 63 })).validate().is_err());
        assert!(request(json!({ "text": "a", "size": 1025 })).validate().is_err());
        assert!(request(json!({ "text": "a", "size": 64 })).validate().is_ok());
        assert!(request(json!({ "text": "a", "color": "blue" })).validate().is_err());
        assert!(request(json!({ "text": "a", "format": "gif" })).validate().is_err());

        let (_, params) = request(json!({ "text": "a", "format": "SVG" })).validate().unwrap();
        assert_eq!(params.format, OutputFormat::Svg);
    }

    #[test]
    fn params_serialize_with_null_logo() {
        let params = GenerationParams {
            color: "#ff0000".into(),
            size: 128,
            logo: None,
            format: OutputFormat::Png,
        };
        let json: Value = serde_json::to_value(&params).unwrap();
        assert_eq!(json, json!({ "color": "#ff0000", "size": 128, "logo": null, "format": "png" }));
    }

    #[test]
    fn error_statuses() {
        assert_eq!(GenerateError::LogoNotFound("a.png".into()).status_code(), 500);
        assert_eq!(GenerateError::Render(RenderError::DataTooLong).status_code(), 400);
        assert_eq!(GenerateError::Logo(LogoError::InvalidName("..".into())).status_code(), 400);
        assert_eq!(
            GenerateError::Render(RenderError::Svg("bad".into())).public_message(),
            "QR generation failed"
        );
    }
}
