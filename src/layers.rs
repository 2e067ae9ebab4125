//! Layer sprite fetching
//!
//! One entry point, [`LayerSprites::fetch_layer`], serves every layer kind:
//! resolve the index to a resource, load it (tinted when asked), and map
//! failures according to whether the layer is optional.

use image::Rgb;
use std::sync::Arc;

use crate::outfit::{LayerKind, OutfitError, Result};
use crate::provider::{SharedImage, SpriteProvider};
use crate::resolve::ResourceResolver;

/// Resolver and provider bundled for layer lookups.
#[derive(Clone)]
pub struct LayerSprites {
    provider: Arc<dyn SpriteProvider>,
    resolver: ResourceResolver,
}

impl std::fmt::Debug for LayerSprites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerSprites").field("resolver", &self.resolver).finish_non_exhaustive()
    }
}

impl LayerSprites {
    pub fn new(provider: Arc<dyn SpriteProvider>, resolver: ResourceResolver) -> Self {
        Self { provider, resolver }
    }

    pub fn provider(&self) -> &Arc<dyn SpriteProvider> {
        &self.provider
    }

    pub fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    /// Fetch the sprite for one layer.
    ///
    /// - Optional layers (dress, hair, detail) never fail: index 0, a
    ///   missing file or an undecodable file all give the empty image.
    /// - Other layers fail with [`OutfitError::MissingRequiredLayer`] when the
    ///   resource is missing or cannot be loaded.
    pub fn fetch_layer(&self, kind: LayerKind, index: u8, tint: Option<Rgb<u8>>) -> Result<SharedImage> {
        let Some(path) = self.resolver.resolve(kind, index, self.provider.as_ref()) else {
            return if kind.is_optional() {
                Ok(self.provider.get_empty())
            } else {
                Err(OutfitError::MissingRequiredLayer { kind, index })
            };
        };

        let loaded = match tint {
            Some(color) => self.provider.get_colored(&path, color),
            None => self.provider.get(&path),
        };

        match loaded {
            Ok(image) => Ok(image),
            Err(e) if kind.is_optional() => {
                log::warn!("{} layer {} unavailable, drawing nothing: {}", kind, index, e);
                Ok(self.provider.get_empty())
            }
            Err(e) => {
                log::warn!("{} layer {} failed to load: {}", kind, index, e);
                Err(OutfitError::MissingRequiredLayer { kind, index })
            }
        }
    }

    /// Indices for which a sprite of `kind` exists, ascending.
    pub fn available_indices(&self, kind: LayerKind) -> Vec<u8> {
        let dir = self.resolver.directory_for(kind);
        let mut indices: Vec<u8> = self
            .provider
            .list(&dir)
            .iter()
            .filter_map(|name| self.resolver.index_from_file_name(kind, name))
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
