//! QR symbol rendering at an exact pixel size.

use std::fmt::Write as _;

use image::{Rgba, RgbaImage};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};

use crate::color::to_svg_fill;
use crate::compose::Placement;
use crate::{QUIET_ZONE, RenderError};

/// Module matrix of an encoded symbol, without quiet zone.
#[derive(Debug, Clone)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl QrMatrix {
    /// Modules per side, excluding the quiet zone.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Modules per side including the quiet zone on both edges.
    pub fn total_width(&self) -> usize {
        self.width + 2 * QUIET_ZONE
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }

    /// Same lookup in quiet-zone coordinates; the quiet zone is always light.
    fn is_dark_padded(&self, x: usize, y: usize) -> bool {
        if x < QUIET_ZONE || y < QUIET_ZONE {
            return false;
        }
        self.is_dark(x - QUIET_ZONE, y - QUIET_ZONE)
    }
}

/// Encode text into a module matrix.
pub fn encode(text: &str, ec_level: EcLevel) -> Result<QrMatrix, RenderError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), ec_level).map_err(|e| match e {
        QrError::DataTooLong => RenderError::DataTooLong,
        other => RenderError::Encode(other.to_string()),
    })?;
    let dark = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();
    Ok(QrMatrix {
        width: code.width(),
        dark,
    })
}

/// Render the matrix into a `size` x `size` bitmap.
///
/// Each output pixel samples the module under it, so the result is exactly
/// `size` pixels wide even when `size` is not a multiple of the module count.
pub fn render_raster(
    matrix: &QrMatrix,
    size: u32,
    dark: Rgba<u8>,
    light: Rgba<u8>,
) -> Result<RgbaImage, RenderError> {
    if size == 0 {
        return Err(RenderError::InvalidSize(size));
    }
    let total = matrix.total_width() as u64;
    let size_u64 = u64::from(size);

    // Column lookup is shared by every row.
    let module_of: Vec<usize> = (0..size_u64)
        .map(|p| (p * total / size_u64) as usize)
        .collect();

    let img = RgbaImage::from_fn(size, size, |x, y| {
        let mx = module_of[x as usize];
        let my = module_of[y as usize];
        if matrix.is_dark_padded(mx, my) { dark } else { light }
    });

    tracing::debug!(modules = matrix.width(), size, "Rendered QR raster");
    Ok(img)
}

/// Render the matrix as a standalone SVG document of `size` x `size` pixels.
///
/// `logo` embeds an image (usually a PNG data URL) at a pixel placement.
pub fn render_svg(
    matrix: &QrMatrix,
    size: u32,
    dark: Rgba<u8>,
    light: Rgba<u8>,
    logo: Option<(&str, Placement)>,
) -> Result<String, RenderError> {
    if size == 0 {
        return Err(RenderError::InvalidSize(size));
    }
    let total = matrix.total_width();
    let (dark_fill, dark_opacity) = to_svg_fill(dark);
    let (light_fill, light_opacity) = to_svg_fill(light);

    let mut path = String::new();
    for y in 0..matrix.width() {
        for x in 0..matrix.width() {
            if matrix.is_dark(x, y) {
                let _ = write!(path, "M{},{}h1v1h-1z", x + QUIET_ZONE, y + QUIET_ZONE);
            }
        }
    }

    let mut svg = String::with_capacity(path.len() + 512);
    let _ = write!(
        svg,
        r#"<?xml version="1.0" encoding="UTF-8"?><svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{size}" height="{size}" viewBox="0 0 {total} {total}" shape-rendering="crispEdges">"#
    );
    let _ = write!(
        svg,
        r#"<rect width="{total}" height="{total}" fill="{light_fill}" fill-opacity="{light_opacity}"/>"#
    );
    let _ = write!(
        svg,
        r#"<path d="{path}" fill="{dark_fill}" fill-opacity="{dark_opacity}"/>"#
    );

    if let Some((href, placement)) = logo {
        let unit = total as f64 / f64::from(size);
        let _ = write!(
            svg,
            r#"<image x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" preserveAspectRatio="none" href="{href}" xlink:href="{href}"/>"#,
            f64::from(placement.x) * unit,
            f64::from(placement.y) * unit,
            f64::from(placement.size) * unit,
            f64::from(placement.size) * unit,
        );
    }
    svg.push_str("</svg>");
    Ok(svg)
}
