//! QR rendering and logo compositing.
//!
//! Symbol construction is delegated to the `qrcode` crate; this crate turns
//! the module matrix into an exact-size raster or SVG, decodes logo images
//! (raster or SVG) and alpha-composites them onto the code.

pub mod color;
pub mod compose;
pub mod dataurl;
pub mod logo;
pub mod qr;

pub use color::parse_hex_color;
pub use compose::{Placement, composite, logo_placement};
pub use dataurl::{DataUrl, encode_data_url, encode_png, parse_data_url};
pub use logo::{LogoKind, load_logo};
pub use qr::{QrMatrix, encode, render_raster, render_svg};
pub use qrcode::EcLevel;

/// Quiet zone around the symbol, in modules.
pub const QUIET_ZONE: usize = 4;

/// Logo edge length as a fraction of the canvas edge.
pub const LOGO_SCALE: f32 = 0.2;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Text is too long for a QR code")]
    DataTooLong,
    #[error("QR encode error: {0}")]
    Encode(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Invalid image size: {0}")]
    InvalidSize(u32),
    #[error("Invalid data URL: {0}")]
    DataUrl(String),
    #[error("SVG error: {0}")]
    Svg(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
