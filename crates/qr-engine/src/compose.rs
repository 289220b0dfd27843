//! Logo compositing over a rendered code.

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};

/// Square region a logo occupies on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// Centered square of `scale` times the canvas edge.
pub fn logo_placement(canvas: u32, scale: f32) -> Placement {
    let size = ((canvas as f32) * scale).round().max(1.0) as u32;
    let size = size.min(canvas);
    let offset = (canvas - size) / 2;
    Placement {
        x: offset,
        y: offset,
        size,
    }
}

/// Draw `logo` centered on a copy of `base`, stretched to the placement square.
pub fn composite(base: &RgbaImage, logo: &DynamicImage, scale: f32) -> (RgbaImage, Placement) {
    let placement = logo_placement(base.width().min(base.height()), scale);
    let fitted = if logo.width() == placement.size && logo.height() == placement.size {
        logo.to_rgba8()
    } else {
        logo.resize_exact(placement.size, placement.size, FilterType::Lanczos3)
            .to_rgba8()
    };

    let mut out = base.clone();
    overlay(&mut out, &fitted, placement.x, placement.y);
    (out, placement)
}

/// Overlay `top` onto `base` at the given position with source-over blending.
pub fn overlay(base: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x >= base.width() || target_y >= base.height() {
            continue;
        }
        match pixel[3] {
            0 => {}
            255 => base.put_pixel(target_x, target_y, *pixel),
            _ => {
                let bg = *base.get_pixel(target_x, target_y);
                base.put_pixel(target_x, target_y, blend_pixel(bg, *pixel));
            }
        }
    }
}

fn blend_pixel(bg: Rgba<u8>, fg: Rgba<u8>) -> Rgba<u8> {
    let fa = f32::from(fg[3]) / 255.0;
    let ba = f32::from(bg[3]) / 255.0;
    let out_a = fa + ba * (1.0 - fa);
    if out_a <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let c = (f32::from(fg[i]) * fa + f32::from(bg[i]) * ba * (1.0 - fa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
