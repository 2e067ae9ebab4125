//! Outfit compositing

use image::{Rgba, RgbaImage};

use super::blend::blit_layer;
use crate::layers::LayerSprites;
use crate::outfit::{ColorProfile, LayerKind, OutfitCode, OutfitError, Result};

/// Compose the layers of an outfit into one image.
///
/// The canvas takes the size of the body sprite. Layers are drawn in
/// [`LayerKind::DRAW_ORDER`] at the origin, each alpha-blended over the
/// layers below it. Dress, hair and detail are tinted from `profile`.
///
/// # Errors
///
/// - [`OutfitError::InvalidOutfitCode`] if the body sprite is missing or
///   cannot be loaded
/// - [`OutfitError::MissingRequiredLayer`] if the head sprite is missing
///
/// # Examples
///
/// ```
/// use image::RgbaImage;
/// use outfitstore::composition::compose_outfit;
/// use outfitstore::layers::LayerSprites;
/// use outfitstore::outfit::{ColorProfile, OutfitCode};
/// use outfitstore::provider::MemorySpriteProvider;
/// use outfitstore::resolve::{LayoutMode, ResourceResolver};
/// use std::sync::Arc;
///
/// let provider = MemorySpriteProvider::new()
///     .with("outfits/body/body_001.png", RgbaImage::new(48, 64))
///     .with("outfits/head_0.png", RgbaImage::new(48, 64));
/// let layers = LayerSprites::new(
///     Arc::new(provider),
///     ResourceResolver::new("outfits", LayoutMode::Modern),
/// );
///
/// let image = compose_outfit(&layers, OutfitCode(1), &ColorProfile::PLAIN).unwrap();
/// assert_eq!(image.dimensions(), (48, 64));
/// ```
pub fn compose_outfit(layers: &LayerSprites, code: OutfitCode, profile: &ColorProfile) -> Result<RgbaImage> {
    let parts = code.decode();

    let body = layers.fetch_layer(LayerKind::Body, parts.body, None).map_err(|e| match e {
        OutfitError::MissingRequiredLayer { kind: LayerKind::Body, index } => {
            OutfitError::InvalidOutfitCode { code: code.0, body: index }
        }
        other => other,
    })?;

    let mut canvas = RgbaImage::from_pixel(body.width(), body.height(), Rgba([0, 0, 0, 0]));
    blit_layer(&mut canvas, &body);

    for kind in &LayerKind::DRAW_ORDER[1..] {
        let index = parts.index(*kind).unwrap_or(0);
        let tint = if kind.is_tintable() { profile.tint(*kind) } else { None };
        let layer = layers.fetch_layer(*kind, index, tint)?;
        blit_layer(&mut canvas, &layer);
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemorySpriteProvider;
    use crate::resolve::{LayoutMode, ResourceResolver};
    use image::Rgb;
    use std::sync::Arc;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    /// 4x1 image with `color` on the first `n` pixels.
    fn strip(n: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_fn(4, 1, |x, _| if x < n { color } else { CLEAR })
    }

    fn layers(provider: MemorySpriteProvider) -> LayerSprites {
        LayerSprites::new(Arc::new(provider), ResourceResolver::new("outfits", LayoutMode::Modern))
    }

    #[test]
    fn test_later_layers_occlude_earlier() {
        let provider = MemorySpriteProvider::new()
            .with("outfits/body/body_001.png", strip(4, RED))
            .with("outfits/dress_1.png", strip(3, GREEN))
            .with("outfits/head_1.png", strip(2, BLUE))
            .with("outfits/hair_1.png", strip(1, WHITE));

        // hair=1 head=1 dress=1 body=1
        let image = compose_outfit(&layers(provider), OutfitCode(1_01_01_01), &ColorProfile::PLAIN).unwrap();

        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(1, 0), BLUE);
        assert_eq!(*image.get_pixel(2, 0), GREEN);
        assert_eq!(*image.get_pixel(3, 0), RED);
    }

    #[test]
    fn test_empty_optional_layers_leave_body() {
        let body = RgbaImage::from_fn(4, 1, |x, _| Rgba([x as u8 * 40, 10, 20, 255]));
        let provider = MemorySpriteProvider::new()
            .with("outfits/body/body_002.png", body.clone())
            .with("outfits/head_0.png", RgbaImage::new(4, 1));

        let image = compose_outfit(&layers(provider), OutfitCode(2), &ColorProfile::PLAIN).unwrap();
        assert_eq!(image, body);
    }

    #[test]
    fn test_profile_tints_dress_hair_detail() {
        let provider = MemorySpriteProvider::new()
            .with("outfits/body/body_000.png", RgbaImage::new(4, 1))
            .with("outfits/head_0.png", RgbaImage::new(4, 1))
            .with("outfits/dress_1.png", strip(4, WHITE))
            .with("outfits/hair_1.png", strip(2, WHITE))
            .with("outfits/detail_1.png", strip(1, WHITE));
        let profile = ColorProfile::new()
            .with_tint(LayerKind::Dress, Rgb([255, 0, 0]))
            .with_tint(LayerKind::Hair, Rgb([0, 255, 0]))
            .with_tint(LayerKind::Detail, Rgb([0, 0, 255]));

        // detail=1 hair=1 head=0 dress=1 body=0
        let image = compose_outfit(&layers(provider), OutfitCode(1_01_00_01_00), &profile).unwrap();
        assert_eq!(*image.get_pixel(0, 0), BLUE);
        assert_eq!(*image.get_pixel(1, 0), GREEN);
        assert_eq!(*image.get_pixel(2, 0), RED);
    }

    #[test]
    fn test_canvas_takes_body_size() {
        let provider = MemorySpriteProvider::new()
            .with("outfits/body/body_000.png", RgbaImage::new(3, 2))
            .with("outfits/head_0.png", RgbaImage::from_pixel(8, 8, RED));

        let image = compose_outfit(&layers(provider), OutfitCode(0), &ColorProfile::PLAIN).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert!(image.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_missing_body_is_invalid_code() {
        let provider = MemorySpriteProvider::new().with("outfits/head_0.png", RgbaImage::new(1, 1));
        assert_eq!(
            compose_outfit(&layers(provider), OutfitCode(42), &ColorProfile::PLAIN),
            Err(OutfitError::InvalidOutfitCode { code: 42, body: 42 })
        );
    }

    #[test]
    fn test_corrupt_body_is_invalid_code() {
        let provider = MemorySpriteProvider::new().with("outfits/head_0.png", RgbaImage::new(1, 1));
        provider.insert_corrupt("outfits/body/body_003.png", "truncated");
        assert_eq!(
            compose_outfit(&layers(provider), OutfitCode(3), &ColorProfile::PLAIN),
            Err(OutfitError::InvalidOutfitCode { code: 3, body: 3 })
        );
    }

    #[test]
    fn test_missing_head_fails() {
        let provider = MemorySpriteProvider::new().with("outfits/body/body_000.png", RgbaImage::new(1, 1));
        assert_eq!(
            compose_outfit(&layers(provider), OutfitCode(5_00_00), &ColorProfile::PLAIN),
            Err(OutfitError::MissingRequiredLayer { kind: LayerKind::Head, index: 5 })
        );
    }
}
