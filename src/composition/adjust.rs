//! Whole-image color adjustments
//!
//! Both layer tints and the colored-light adjustment of a composed outfit
//! are the same operation: blend one color uniformly into every visible
//! pixel, leaving alpha untouched. The result depends only on the input
//! pixels, the color and the mode, which is what lets both be cached.

use image::{Rgb, Rgba, RgbaImage};

use super::blend::BlendMode;

/// Blend `color` into every non-transparent pixel of `image`.
pub fn apply_adjustment(image: &RgbaImage, color: Rgb<u8>, mode: BlendMode) -> RgbaImage {
    let tint = [color[0] as f32 / 255.0, color[1] as f32 / 255.0, color[2] as f32 / 255.0];
    let mut out = image.clone();

    for pixel in out.pixels_mut() {
        if pixel[3] == 0 {
            continue;
        }
        let src = *pixel;
        let channel = |i: usize| {
            let base = src[i] as f32 / 255.0;
            (mode.blend_channel(base, tint[i]).clamp(0.0, 1.0) * 255.0).round() as u8
        };
        *pixel = Rgba([channel(0), channel(1), channel(2), src[3]]);
    }

    out
}

/// Recolor a layer sprite with a profile tint.
///
/// Sprites are authored in greyscale-ish base colors, so a multiplicative
/// tint preserves their shading.
pub fn tint_image(image: &RgbaImage, color: Rgb<u8>) -> RgbaImage {
    apply_adjustment(image, color, BlendMode::Multiply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_white_by_tint_gives_tint() {
        let image = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 200]));
        let out = tint_image(&image, Rgb([255, 0, 128]));
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 0, 128, 200]));
    }

    #[test]
    fn test_transparent_pixels_untouched() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(1, 0, Rgba([100, 100, 100, 255]));
        let out = apply_adjustment(&image, Rgb([255, 0, 0]), BlendMode::Normal);
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*out.get_pixel(1, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_adjustment_is_deterministic() {
        let image = RgbaImage::from_fn(4, 4, |x, y| Rgba([x as u8 * 60, y as u8 * 60, 90, 255]));
        let a = apply_adjustment(&image, Rgb([200, 30, 30]), BlendMode::Overlay);
        let b = apply_adjustment(&image, Rgb([200, 30, 30]), BlendMode::Overlay);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_modes_differ() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 255]));
        let multiply = apply_adjustment(&image, Rgb([255, 0, 0]), BlendMode::Multiply);
        let screen = apply_adjustment(&image, Rgb([255, 0, 0]), BlendMode::Screen);
        assert_ne!(multiply, screen);
    }
}
