//! Color parsing and formatting for outfit tints
//!
//! Tints are opaque RGB colors. They can be written as:
//! - Hex: `#RGB`, `#RRGGBB`
//! - Functional: `rgb()`, `hsl()`, `hwb()`, `oklch()`
//! - Named: `red`, `navy`, `goldenrod`, etc.
//!
//! Alpha components in the input are accepted and discarded; a tint is
//! applied uniformly and never changes layer transparency.

use image::Rgb;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a color string into an RGB tint.
///
/// # Examples
///
/// ```
/// use outfitstore::color::parse_rgb;
///
/// assert_eq!(parse_rgb("#F00").unwrap(), image::Rgb([255, 0, 0]));
/// assert_eq!(parse_rgb("#00ff00").unwrap(), image::Rgb([0, 255, 0]));
/// assert_eq!(parse_rgb("blue").unwrap(), image::Rgb([0, 0, 255]));
/// assert_eq!(parse_rgb("rgb(10, 20, 30)").unwrap(), image::Rgb([10, 20, 30]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is invalid or unparseable.
pub fn parse_rgb(s: &str) -> Result<Rgb<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    parse_css_color(s)
}

/// Format a tint as lowercase `#rrggbb`.
pub fn to_hex(color: Rgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Pack a tint as an opaque `0xAARRGGBB` value.
pub fn packed_rgb(color: Rgb<u8>) -> u32 {
    0xFF00_0000 | (color[0] as u32) << 16 | (color[1] as u32) << 8 | color[2] as u32
}

fn parse_hex(hex: &str) -> Result<Rgb<u8>, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    // All chars are ASCII hex digits from here on, so byte slicing is safe.
    match hex.len() {
        // #RGB / #RGBA: each digit is doubled
        3 | 4 => {
            let r = hex_value(&hex[0..1])? * 17;
            let g = hex_value(&hex[1..2])? * 17;
            let b = hex_value(&hex[2..3])? * 17;
            Ok(Rgb([r, g, b]))
        }
        6 | 8 => {
            let r = hex_value(&hex[0..2])?;
            let g = hex_value(&hex[2..4])?;
            let b = hex_value(&hex[4..6])?;
            Ok(Rgb([r, g, b]))
        }
        len => Err(ColorError::InvalidLength(len)),
    }
}

fn hex_value(digits: &str) -> Result<u8, ColorError> {
    u8::from_str_radix(digits, 16).map_err(|_| ColorError::InvalidHex(digits.chars().next().unwrap_or('?')))
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgb<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgb([rgba.red, rgba.green, rgba.blue])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => {
                let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                Ok(Rgb([channel(rgb.r), channel(rgb.g), channel(rgb.b)]))
            }
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}
