//! Sprite resource providers
//!
//! The compositor never touches files directly. It asks a [`SpriteProvider`]
//! for images by resource path (`outfits/hair_3.png`), optionally tinted.
//! Providers own their own thread-safety and any raw image caching.
//!
//! Two implementations ship with the crate:
//! - [`FsSpriteProvider`] loads PNGs from an asset root on disk
//! - [`MemorySpriteProvider`] serves images registered in memory

mod fs;
mod memory;

pub use fs::FsSpriteProvider;
pub use memory::MemorySpriteProvider;

use image::{Rgb, Rgba, RgbaImage};
use std::sync::Arc;
use thiserror::Error;

use crate::composition::{apply_adjustment, tint_image, BlendMode};

/// An immutable image shared between the cache and its readers.
pub type SharedImage = Arc<RgbaImage>;

/// Magenta used for the provider failsafe image
pub const FAILSAFE_COLOR: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// Size of the generated failsafe image (one 48x64 character frame).
pub const FAILSAFE_SIZE: (u32, u32) = (48, 64);

/// Error when loading a sprite resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AssetError {
    /// No resource exists at the path
    #[error("Sprite resource '{0}' not found")]
    NotFound(String),
    /// The resource exists but could not be decoded
    #[error("Failed to decode sprite '{path}': {message}")]
    Decode { path: String, message: String },
}

/// Source of raw sprite images, addressed by `/`-separated resource paths.
pub trait SpriteProvider: Send + Sync {
    /// Whether a resource exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Whether `path` names a directory of resources.
    fn is_dir(&self, path: &str) -> bool;

    /// File names (not paths) of the resources directly inside `dir`.
    fn list(&self, dir: &str) -> Vec<String>;

    /// Load the image at `path`.
    fn get(&self, path: &str) -> Result<SharedImage, AssetError>;

    /// Load the image at `path` recolored with `color`.
    ///
    /// Must be a pure function of `(path, color)`.
    fn get_colored(&self, path: &str, color: Rgb<u8>) -> Result<SharedImage, AssetError> {
        let image = self.get(path)?;
        Ok(Arc::new(tint_image(&image, color)))
    }

    /// The empty layer: a zero-sized image that draws nothing.
    fn get_empty(&self) -> SharedImage {
        Arc::new(RgbaImage::new(0, 0))
    }

    /// An image that is always available, for when nothing else can be drawn.
    fn get_failsafe(&self) -> SharedImage {
        Arc::new(generated_failsafe())
    }

    /// Apply a uniform color adjustment to an already composed image.
    ///
    /// `key` identifies the result for providers that keep their own cache.
    fn modify(&self, image: &RgbaImage, color: Rgb<u8>, blend: BlendMode, key: &str) -> SharedImage {
        log::debug!("adjusting image for {}", key);
        Arc::new(apply_adjustment(image, color, blend))
    }
}

/// Solid magenta frame, the last-resort image.
pub(crate) fn generated_failsafe() -> RgbaImage {
    RgbaImage::from_pixel(FAILSAFE_SIZE.0, FAILSAFE_SIZE.1, FAILSAFE_COLOR)
}

/// Normalize a resource path for lookup: forward slashes, no leading `./`
/// or `/`, no trailing `/`.
pub(crate) fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut path = path.as_str();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path.trim_matches('/').to_string()
}
