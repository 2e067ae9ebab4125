//! Filesystem-backed sprite provider

use glob::{glob, Pattern};
use image::Rgb;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{generated_failsafe, normalize_path, AssetError, SharedImage, SpriteProvider};
use crate::color::to_hex;
use crate::composition::tint_image;

/// Loads PNG sprites from an asset root directory.
///
/// Decoded and tinted images are memoized by resource path (and tint) so
/// that repeated layer fetches share one decoded image. The memo tables are
/// guarded by read-write locks; concurrent first loads of the same path may
/// both decode, but only the first result is kept.
#[derive(Debug)]
pub struct FsSpriteProvider {
    root: PathBuf,
    failsafe: Option<String>,
    memoize: bool,
    images: RwLock<HashMap<String, SharedImage>>,
    colored: RwLock<HashMap<(String, [u8; 3]), SharedImage>>,
}

impl FsSpriteProvider {
    /// Create a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            failsafe: None,
            memoize: true,
            images: RwLock::new(HashMap::new()),
            colored: RwLock::new(HashMap::new()),
        }
    }

    /// Use the image at `path` (relative to the root) as the failsafe.
    ///
    /// If it cannot be loaded, a generated magenta frame is used instead.
    pub fn with_failsafe(mut self, path: impl Into<String>) -> Self {
        self.failsafe = Some(path.into());
        self
    }

    /// Enable or disable memoization of decoded images.
    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// The asset root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of memoized images (plain and tinted).
    pub fn memoized_len(&self) -> usize {
        self.images.read().len() + self.colored.read().len()
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(normalize_path(path))
    }

    fn load(&self, path: &str) -> Result<SharedImage, AssetError> {
        let full = self.full_path(path);
        if !full.is_file() {
            return Err(AssetError::NotFound(path.to_string()));
        }
        let image = image::open(&full)
            .map_err(|e| AssetError::Decode { path: path.to_string(), message: e.to_string() })?;
        log::debug!("decoded sprite {}", full.display());
        Ok(Arc::new(image.to_rgba8()))
    }
}

impl SpriteProvider for FsSpriteProvider {
    fn exists(&self, path: &str) -> bool {
        self.full_path(path).is_file()
    }

    fn is_dir(&self, path: &str) -> bool {
        self.full_path(path).is_dir()
    }

    fn list(&self, dir: &str) -> Vec<String> {
        let dir_path = self.full_path(dir);
        let pattern = format!("{}/*.png", Pattern::escape(&dir_path.to_string_lossy()));

        let mut names: Vec<String> = match glob(&pattern) {
            Ok(paths) => paths
                .filter_map(Result::ok)
                .filter(|p| p.is_file())
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect(),
            Err(e) => {
                log::warn!("cannot list sprites in {}: {}", dir_path.display(), e);
                Vec::new()
            }
        };
        names.sort();
        names
    }

    fn get(&self, path: &str) -> Result<SharedImage, AssetError> {
        if !self.memoize {
            return self.load(path);
        }

        let key = normalize_path(path);
        if let Some(image) = self.images.read().get(&key) {
            return Ok(Arc::clone(image));
        }

        let image = self.load(path)?;
        let mut images = self.images.write();
        Ok(Arc::clone(images.entry(key).or_insert(image)))
    }

    fn get_colored(&self, path: &str, color: Rgb<u8>) -> Result<SharedImage, AssetError> {
        let key = (normalize_path(path), color.0);
        if self.memoize {
            if let Some(image) = self.colored.read().get(&key) {
                return Ok(Arc::clone(image));
            }
        }

        let base = self.get(path)?;
        let tinted = Arc::new(tint_image(&base, color));
        log::debug!("tinted {} with {}", path, to_hex(color));

        if !self.memoize {
            return Ok(tinted);
        }
        let mut colored = self.colored.write();
        Ok(Arc::clone(colored.entry(key).or_insert(tinted)))
    }

    fn get_failsafe(&self) -> SharedImage {
        if let Some(path) = &self.failsafe {
            match self.get(path) {
                Ok(image) => return image,
                Err(e) => log::warn!("failsafe sprite unavailable ({}), using generated frame", e),
            }
        }
        Arc::new(generated_failsafe())
    }
}
