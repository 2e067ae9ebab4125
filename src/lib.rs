//! Outfit compositing and caching
//!
//! Character sprites are assembled from layers (body, dress, head, hair,
//! detail) selected by a compact numeric outfit code and tinted by a color
//! profile. This library:
//! - Decodes outfit codes and resolves each layer to a sprite resource
//! - Composes the layers in a fixed draw order
//! - Caches composed and color-adjusted outfits, building each at most once
//!   even under concurrent requests
//!
//! ```
//! use image::RgbaImage;
//! use outfitstore::outfit::{ColorProfile, OutfitCode};
//! use outfitstore::provider::MemorySpriteProvider;
//! use outfitstore::store::OutfitStore;
//! use std::sync::Arc;
//!
//! let provider = MemorySpriteProvider::new()
//!     .with("outfits/body/body_000.png", RgbaImage::new(48, 64))
//!     .with("outfits/head_0.png", RgbaImage::new(48, 64));
//! let store = OutfitStore::new(Arc::new(provider), "outfits");
//!
//! let outfit = store.get_outfit(OutfitCode(0), &ColorProfile::PLAIN).unwrap();
//! assert_eq!(outfit.dimensions(), (48, 64));
//! ```

pub mod cache;
pub mod cli;
pub mod color;
pub mod composition;
pub mod config;
pub mod layers;
pub mod outfit;
pub mod provider;
pub mod resolve;
pub mod store;
