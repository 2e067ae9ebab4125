//! In-memory sprite provider

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{normalize_path, AssetError, SharedImage, SpriteProvider};
use image::RgbaImage;

#[derive(Debug, Clone)]
enum Entry {
    Image(SharedImage),
    /// Present but undecodable
    Corrupt(String),
}

/// Serves images registered at runtime.
///
/// Useful for hosts that ship sprites inside another archive format, and
/// for tests. Every `get` is counted so callers can verify how often the
/// provider was hit.
#[derive(Debug, Default)]
pub struct MemorySpriteProvider {
    entries: RwLock<HashMap<String, Entry>>,
    failsafe: RwLock<Option<SharedImage>>,
    loads: AtomicUsize,
}

impl MemorySpriteProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image at `path`, replacing any previous entry.
    pub fn insert(&self, path: &str, image: RgbaImage) {
        self.entries.write().insert(normalize_path(path), Entry::Image(Arc::new(image)));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(self, path: &str, image: RgbaImage) -> Self {
        self.insert(path, image);
        self
    }

    /// Register a resource that exists but fails to decode.
    pub fn insert_corrupt(&self, path: &str, message: &str) {
        self.entries.write().insert(normalize_path(path), Entry::Corrupt(message.to_string()));
    }

    /// Remove the resource at `path`.
    pub fn remove(&self, path: &str) {
        self.entries.write().remove(&normalize_path(path));
    }

    /// Use `image` as the failsafe instead of the generated frame.
    pub fn set_failsafe(&self, image: RgbaImage) {
        *self.failsafe.write() = Some(Arc::new(image));
    }

    /// Number of `get` calls served so far (including failed ones).
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl SpriteProvider for MemorySpriteProvider {
    fn exists(&self, path: &str) -> bool {
        self.entries.read().contains_key(&normalize_path(path))
    }

    fn is_dir(&self, path: &str) -> bool {
        let prefix = format!("{}/", normalize_path(path));
        self.entries.read().keys().any(|k| k.starts_with(&prefix))
    }

    fn list(&self, dir: &str) -> Vec<String> {
        let prefix = format!("{}/", normalize_path(dir));
        let mut names: Vec<String> = self
            .entries
            .read()
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    fn get(&self, path: &str) -> Result<SharedImage, AssetError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match self.entries.read().get(&normalize_path(path)) {
            Some(Entry::Image(image)) => Ok(Arc::clone(image)),
            Some(Entry::Corrupt(message)) => {
                Err(AssetError::Decode { path: path.to_string(), message: message.clone() })
            }
            None => Err(AssetError::NotFound(path.to_string())),
        }
    }

    fn get_failsafe(&self) -> SharedImage {
        match &*self.failsafe.read() {
            Some(image) => Arc::clone(image),
            None => Arc::new(super::generated_failsafe()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_insert_and_get() {
        let provider = MemorySpriteProvider::new().with("outfits/head_1.png", RgbaImage::new(2, 2));
        assert!(provider.exists("outfits/head_1.png"));
        assert_eq!(provider.get("outfits/head_1.png").unwrap().dimensions(), (2, 2));
        assert_eq!(provider.load_count(), 1);
    }

    #[test]
    fn test_directories_and_listing() {
        let provider = MemorySpriteProvider::new()
            .with("outfits/body/body_001.png", RgbaImage::new(1, 1))
            .with("outfits/body/body_000.png", RgbaImage::new(1, 1))
            .with("outfits/dress_1.png", RgbaImage::new(1, 1));

        assert!(provider.is_dir("outfits/body"));
        assert!(provider.is_dir("outfits"));
        assert!(!provider.is_dir("outfits/dress_1.png"));
        assert_eq!(provider.list("outfits/body"), vec!["body_000.png", "body_001.png"]);
        assert_eq!(provider.list("outfits"), vec!["dress_1.png"]);
    }

    #[test]
    fn test_corrupt_and_missing() {
        let provider = MemorySpriteProvider::new();
        provider.insert_corrupt("outfits/hair_1.png", "truncated");
        assert!(provider.exists("outfits/hair_1.png"));
        assert!(matches!(provider.get("outfits/hair_1.png"), Err(AssetError::Decode { .. })));
        assert!(matches!(provider.get("outfits/hair_2.png"), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_default_colored_uses_multiply_tint() {
        let provider = MemorySpriteProvider::new()
            .with("a.png", RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255])));
        let tinted = provider.get_colored("a.png", image::Rgb([10, 20, 30])).unwrap();
        assert_eq!(*tinted.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_custom_failsafe() {
        let provider = MemorySpriteProvider::new();
        assert_eq!(provider.get_failsafe().dimensions(), super::super::FAILSAFE_SIZE);
        provider.set_failsafe(RgbaImage::new(5, 5));
        assert_eq!(provider.get_failsafe().dimensions(), (5, 5));
    }
}
