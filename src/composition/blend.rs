//! Blend modes and alpha blitting

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Blend modes for color adjustments and tints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Replace the color, keep the alpha
    #[default]
    Normal,
    /// Darkens underlying colors: result = base * blend
    Multiply,
    /// Lightens underlying colors: result = 1 - (1 - base) * (1 - blend)
    Screen,
    /// Combines multiply/screen based on base brightness
    Overlay,
    /// Additive blending: result = min(1, base + blend)
    Add,
    /// Subtractive blending: result = max(0, base - blend)
    Subtract,
    /// Color difference: result = abs(base - blend)
    Difference,
    /// Keeps darker color: result = min(base, blend)
    Darken,
    /// Keeps lighter color: result = max(base, blend)
    Lighten,
}

impl BlendMode {
    /// All blend modes, in declaration order.
    pub const ALL: [BlendMode; 9] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Add,
        BlendMode::Subtract,
        BlendMode::Difference,
        BlendMode::Darken,
        BlendMode::Lighten,
    ];

    /// Stable identifier, used in cache signatures.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Add => "add",
            BlendMode::Subtract => "subtract",
            BlendMode::Difference => "difference",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
        }
    }

    /// Apply blend mode to a single color channel (values are 0.0-1.0)
    pub(crate) fn blend_channel(&self, base: f32, blend: f32) -> f32 {
        match self {
            BlendMode::Normal => blend,
            BlendMode::Multiply => base * blend,
            BlendMode::Screen => 1.0 - (1.0 - base) * (1.0 - blend),
            BlendMode::Overlay => {
                if base < 0.5 {
                    2.0 * base * blend
                } else {
                    1.0 - 2.0 * (1.0 - base) * (1.0 - blend)
                }
            }
            BlendMode::Add => (base + blend).min(1.0),
            BlendMode::Subtract => (base - blend).max(0.0),
            BlendMode::Difference => (base - blend).abs(),
            BlendMode::Darken => base.min(blend),
            BlendMode::Lighten => base.max(blend),
        }
    }
}

/// Error returned when parsing an unknown blend mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown blend mode '{0}'")]
pub struct UnknownBlendMode(pub String);

impl FromStr for BlendMode {
    type Err = UnknownBlendMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(BlendMode::Normal),
            "multiply" => Ok(BlendMode::Multiply),
            "screen" => Ok(BlendMode::Screen),
            "overlay" => Ok(BlendMode::Overlay),
            "add" | "additive" => Ok(BlendMode::Add),
            "subtract" | "subtractive" => Ok(BlendMode::Subtract),
            "difference" => Ok(BlendMode::Difference),
            "darken" => Ok(BlendMode::Darken),
            "lighten" => Ok(BlendMode::Lighten),
            _ => Err(UnknownBlendMode(s.to_string())),
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draw `layer` over `canvas` at the origin using source-over alpha
/// compositing. Pixels outside the canvas are clipped; an empty layer is
/// a no-op.
pub(crate) fn blit_layer(canvas: &mut RgbaImage, layer: &RgbaImage) {
    let canvas_width = canvas.width();
    let canvas_height = canvas.height();

    for (sy, row) in layer.rows().enumerate() {
        let dest_y = sy as u32;
        if dest_y >= canvas_height {
            break;
        }

        for (sx, src) in row.enumerate() {
            let dest_x = sx as u32;
            if dest_x >= canvas_width {
                break;
            }

            // Fully transparent source, skip
            if src[3] == 0 {
                continue;
            }

            let dst = canvas.get_pixel(dest_x, dest_y);
            let blended = source_over(src, dst);
            canvas.put_pixel(dest_x, dest_y, blended);
        }
    }
}

/// Porter-Duff "source over" for straight (non-premultiplied) alpha.
pub(crate) fn source_over(src: &Rgba<u8>, dst: &Rgba<u8>) -> Rgba<u8> {
    if src[3] == 255 {
        return *src;
    }

    let src_alpha = src[3] as f32 / 255.0;
    let dst_alpha = dst[3] as f32 / 255.0;

    // out_alpha = src_alpha + dst_alpha * (1 - src_alpha)
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    // out_color = (src * src_alpha + dst * dst_alpha * (1 - src_alpha)) / out_alpha
    let composite = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let result = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (result.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([
        composite(src[0], dst[0]),
        composite(src[1], dst[1]),
        composite(src[2], dst[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
