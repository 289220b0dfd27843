//! Logo decoding: raster formats via `image`, SVG via `resvg`.

use image::{DynamicImage, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoKind {
    Svg,
    Raster,
}

impl LogoKind {
    /// Classify by MIME type; `None` for anything that is not an image.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/svg+xml" => Some(Self::Svg),
            m if m.starts_with("image/") => Some(Self::Raster),
            _ => None,
        }
    }

    /// Classify by file extension (without the dot, any case).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "png" | "jpg" | "jpeg" => Some(Self::Raster),
            _ => None,
        }
    }
}

/// Decode logo bytes into a bitmap.
///
/// SVG input is rasterized straight to `target` x `target` so it stays sharp;
/// raster input keeps its natural size and is scaled during compositing.
pub fn load_logo(kind: LogoKind, bytes: &[u8], target: u32) -> Result<DynamicImage, RenderError> {
    match kind {
        LogoKind::Svg => rasterize_svg(bytes, target).map(DynamicImage::ImageRgba8),
        LogoKind::Raster => Ok(image::load_from_memory(bytes)?),
    }
}

/// Parser options for untrusted SVG: nested `<image>` elements may only use
/// inline `data:` payloads, never paths or URLs.
fn svg_options() -> usvg::Options<'static> {
    usvg::Options {
        image_href_resolver: usvg::ImageHrefResolver {
            resolve_data: usvg::ImageHrefResolver::default_data_resolver(),
            resolve_string: Box::new(|href, _| {
                tracing::warn!(href, "Ignoring external image reference in SVG logo");
                None
            }),
        },
        ..usvg::Options::default()
    }
}

fn rasterize_svg(data: &[u8], target: u32) -> Result<RgbaImage, RenderError> {
    if target == 0 {
        return Err(RenderError::InvalidSize(target));
    }
    let tree = usvg::Tree::from_data(data, &svg_options())
        .map_err(|e| RenderError::Svg(e.to_string()))?;
    let mut pixmap =
        tiny_skia::Pixmap::new(target, target).ok_or(RenderError::InvalidSize(target))?;

    let view = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        target as f32 / view.width(),
        target as f32 / view.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha.
    let raw: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    tracing::debug!(target, "Rasterized SVG logo");
    RgbaImage::from_raw(target, target, raw)
        .ok_or_else(|| RenderError::Svg("rasterized buffer has unexpected length".into()))
}
