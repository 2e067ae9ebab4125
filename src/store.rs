//! Outfit store: the public face of compositing and caching
//!
//! The store owns the layer lookup and the cache. Hosts build one at
//! startup and share it (it is `Send + Sync`) with everything that draws
//! characters.

use image::Rgb;
use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::cache::{CacheStats, OutfitCache};
use crate::color::packed_rgb;
use crate::composition::{compose_outfit, BlendMode};
use crate::config::OutfitConfig;
use crate::layers::LayerSprites;
use crate::outfit::{ColorProfile, LayerKind, OutfitCode, Result};
use crate::provider::{FsSpriteProvider, SharedImage, SpriteProvider};
use crate::resolve::{LayoutMode, ResourceResolver};

/// Cache signature of a composed outfit: `OUTFIT:<code>@<profile>`.
pub fn outfit_signature(code: OutfitCode, profile: &ColorProfile) -> String {
    format!("OUTFIT:{}@{}", code, profile.canonical())
}

/// Cache signature of an adjusted outfit: `<base>:<packed color><blend>`.
///
/// The color is the opaque `0xAARRGGBB` value printed as an unsigned
/// decimal, so red gives `4294901760`. Keys built from a signed 32-bit ARGB
/// value (`-65536` for red) never match these signatures.
pub fn adjusted_signature(base: &str, color: Rgb<u8>, blend: BlendMode) -> String {
    format!("{}:{}{}", base, packed_rgb(color), blend.as_str())
}

/// Composes outfits on demand and caches the results.
#[derive(Debug)]
pub struct OutfitStore {
    layers: LayerSprites,
    cache: OutfitCache,
}

impl OutfitStore {
    /// Create a store over `provider`, detecting the layout under
    /// `outfit_dir`.
    pub fn new(provider: Arc<dyn SpriteProvider>, outfit_dir: &str) -> Self {
        let resolver = ResourceResolver::detect(provider.as_ref(), outfit_dir);
        Self::with_parts(LayerSprites::new(provider, resolver), OutfitCache::new())
    }

    /// Create a filesystem-backed store from configuration.
    pub fn from_config(config: &OutfitConfig) -> Self {
        let mut provider =
            FsSpriteProvider::new(&config.assets.root).with_memoize(config.cache.tint_cache);
        if let Some(failsafe) = &config.assets.failsafe {
            provider = provider.with_failsafe(failsafe.clone());
        }
        let provider: Arc<dyn SpriteProvider> = Arc::new(provider);

        let outfit_dir = config.assets.outfit_dir.as_str();
        let resolver = match config.layout.mode.forced() {
            Some(layout) => ResourceResolver::new(outfit_dir, layout),
            None => ResourceResolver::detect(provider.as_ref(), outfit_dir),
        };
        let cache = match NonZeroUsize::new(config.cache.capacity) {
            Some(capacity) => OutfitCache::with_capacity(capacity),
            None => OutfitCache::new(),
        };

        Self::with_parts(LayerSprites::new(provider, resolver), cache)
    }

    /// Create a store from explicit parts.
    pub fn with_parts(layers: LayerSprites, cache: OutfitCache) -> Self {
        Self { layers, cache }
    }

    pub fn layout(&self) -> LayoutMode {
        self.layers.resolver().layout()
    }

    pub fn layers(&self) -> &LayerSprites {
        &self.layers
    }

    /// The composed outfit for `code` tinted by `profile`.
    ///
    /// Built on first request, then served from the cache.
    ///
    /// # Errors
    ///
    /// [`OutfitError::InvalidOutfitCode`](crate::outfit::OutfitError::InvalidOutfitCode)
    /// when the body sprite does not exist, or
    /// [`OutfitError::MissingRequiredLayer`](crate::outfit::OutfitError::MissingRequiredLayer)
    /// when the head sprite does not.
    pub fn get_outfit(&self, code: OutfitCode, profile: &ColorProfile) -> Result<SharedImage> {
        let signature = outfit_signature(code, profile);
        self.build_cached(&signature, code, profile)
    }

    /// The default outfit, or the provider's failsafe image if even that
    /// cannot be built. Never fails.
    pub fn get_failsafe_outfit(&self) -> SharedImage {
        match self.get_outfit(OutfitCode::DEFAULT, &ColorProfile::PLAIN) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Cannot build failsafe outfit, using standard failsafe sprite: {}", e);
                self.layers.provider().get_failsafe()
            }
        }
    }

    /// The outfit with a uniform color adjustment, such as a character
    /// standing in colored light.
    ///
    /// Without both a color and a blend mode this is [`get_outfit`](Self::get_outfit).
    pub fn get_adjusted_outfit(
        &self,
        code: OutfitCode,
        profile: &ColorProfile,
        color: Option<Rgb<u8>>,
        blend: Option<BlendMode>,
    ) -> Result<SharedImage> {
        let base_signature = outfit_signature(code, profile);
        let (Some(color), Some(blend)) = (color, blend) else {
            return self.build_cached(&base_signature, code, profile);
        };

        let signature = adjusted_signature(&base_signature, color, blend);
        self.cache.get_or_build(&signature, || {
            let base = self.build_cached(&base_signature, code, profile)?;
            Ok(self.layers.provider().modify(&base, color, blend, &signature))
        })
    }

    /// A single untinted layer sprite, for pickers and previews.
    ///
    /// Optional layers with index 0 give the empty image. `None` when the
    /// sprite does not exist or cannot be loaded.
    pub fn get_layer(&self, kind: LayerKind, index: u8) -> Option<SharedImage> {
        self.layers.fetch_layer(kind, index, None).ok()
    }

    /// Indices of the existing sprites for a layer.
    pub fn available_indices(&self, kind: LayerKind) -> Vec<u8> {
        self.layers.available_indices(kind)
    }

    /// Build many outfits in parallel, e.g. when a crowd comes into view.
    ///
    /// Results are returned in request order; one failing outfit does not
    /// affect the others.
    pub fn prewarm(&self, requests: &[(OutfitCode, ColorProfile)]) -> Vec<Result<SharedImage>> {
        requests.par_iter().map(|(code, profile)| self.get_outfit(*code, profile)).collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop all cached outfits.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn build_cached(&self, signature: &str, code: OutfitCode, profile: &ColorProfile) -> Result<SharedImage> {
        self.cache.get_or_build(signature, || compose_outfit(&self.layers, code, profile).map(Arc::new))
    }
}
