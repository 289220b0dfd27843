//! CSS-style hex color parsing.

use image::Rgba;

use crate::RenderError;

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into an RGBA pixel.
pub fn parse_hex_color(input: &str) -> Result<Rgba<u8>, RenderError> {
    let invalid = || RenderError::InvalidColor(input.to_string());
    let hex = input.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    match hex.len() {
        3 => {
            let mut out = [0u8, 0, 0, 255];
            for (i, c) in hex.chars().enumerate() {
                let doubled = format!("{c}{c}");
                out[i] = channel(&doubled)?;
            }
            Ok(Rgba(out))
        }
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            let a = if hex.len() == 8 { channel(&hex[6..8])? } else { 255 };
            Ok(Rgba([r, g, b, a]))
        }
        _ => Err(invalid()),
    }
}

/// `#rrggbb` form used in SVG `fill`; alpha is emitted separately.
pub(crate) fn to_svg_fill(color: Rgba<u8>) -> (String, f32) {
    let fill = format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2]);
    (fill, f32::from(color[3]) / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_form() {
        assert_eq!(parse_hex_color("#ff0000").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_hex_color("#00FF7f").unwrap(), Rgba([0, 255, 127, 255]));
    }

    #[test]
    fn parses_short_form() {
        assert_eq!(parse_hex_color("#000").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_hex_color("#fa0").unwrap(), Rgba([255, 170, 0, 255]));
    }

    #[test]
    fn parses_alpha() {
        assert_eq!(parse_hex_color("#11223380").unwrap(), Rgba([17, 34, 51, 128]));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "red", "#12", "#12345", "#gggggg", "000000", "#ff00ff0"] {
            assert!(parse_hex_color(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn svg_fill_drops_alpha() {
        let (fill, opacity) = to_svg_fill(Rgba([255, 0, 16, 255]));
        assert_eq!(fill, "#ff0010");
        assert!((opacity - 1.0).abs() < f32::EPSILON);
    }
}
