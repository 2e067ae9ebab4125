//! Layer resource resolution
//!
//! Maps `(layer kind, index)` to a resource path under the outfit
//! directory:
//!
//! | Layer | Path |
//! |---|---|
//! | body (modern) | `outfits/body/body_005.png` |
//! | body (legacy) | `outfits/player_base_5.png` |
//! | dress, hair, detail | `outfits/dress_3.png` (index 0 = no layer) |
//! | head | `outfits/head_2.png` |
//! | eyes, mouth | `outfits/eyes/eyes_001.png` |
//!
//! Body sprites moved into their own directory at some point; whether that
//! directory exists selects the [`LayoutMode`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::outfit::LayerKind;
use crate::provider::SpriteProvider;

/// Default directory, relative to the asset root, holding outfit sprites.
pub const DEFAULT_OUTFIT_DIR: &str = "outfits";

/// Which body sprite naming scheme the asset tree uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// `body/body_NNN.png`, zero-padded
    Modern,
    /// `player_base_N.png`
    Legacy,
}

impl LayoutMode {
    /// Detect the layout by checking for the `body/` directory.
    ///
    /// The asset tree does not change at runtime, so this is done once when
    /// the resolver is built.
    pub fn detect(provider: &dyn SpriteProvider, outfit_dir: &str) -> Self {
        let mode = if provider.is_dir(&join(outfit_dir, "body")) {
            LayoutMode::Modern
        } else {
            LayoutMode::Legacy
        };
        log::debug!("outfit layout in '{}': {}", outfit_dir, mode);
        mode
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Modern => f.write_str("modern"),
            LayoutMode::Legacy => f.write_str("legacy"),
        }
    }
}

/// Turns layer indices into resource paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResolver {
    outfit_dir: String,
    layout: LayoutMode,
}

impl ResourceResolver {
    /// Create a resolver with a known layout.
    pub fn new(outfit_dir: impl Into<String>, layout: LayoutMode) -> Self {
        let outfit_dir = outfit_dir.into().trim_matches('/').to_string();
        Self { outfit_dir, layout }
    }

    /// Create a resolver, detecting the layout from the provider.
    pub fn detect(provider: &dyn SpriteProvider, outfit_dir: impl Into<String>) -> Self {
        let outfit_dir = outfit_dir.into().trim_matches('/').to_string();
        let layout = LayoutMode::detect(provider, &outfit_dir);
        Self { outfit_dir, layout }
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn outfit_dir(&self) -> &str {
        &self.outfit_dir
    }

    /// The resource path a layer index names, without checking that it
    /// exists. `None` for index 0 of an optional layer.
    pub fn path_for(&self, kind: LayerKind, index: u8) -> Option<String> {
        if kind.is_optional() && index == 0 {
            return None;
        }

        let file = match kind {
            LayerKind::Body => match self.layout {
                LayoutMode::Modern => format!("body/body_{:03}.png", index),
                LayoutMode::Legacy => format!("player_base_{}.png", index),
            },
            LayerKind::Eyes | LayerKind::Mouth => format!("{kind}/{kind}_{:03}.png", index),
            LayerKind::Dress | LayerKind::Head | LayerKind::Hair | LayerKind::Detail => {
                format!("{kind}_{}.png", index)
            }
        };
        Some(join(&self.outfit_dir, &file))
    }

    /// Resolve a layer index to an existing resource.
    ///
    /// Optional layers (dress, hair, detail) resolve to their path without an
    /// existence check; loading failures for them are handled by the caller.
    /// All other layers resolve to `None` when the resource is missing.
    pub fn resolve(&self, kind: LayerKind, index: u8, provider: &dyn SpriteProvider) -> Option<String> {
        let path = self.path_for(kind, index)?;
        if kind.is_optional() || provider.exists(&path) {
            Some(path)
        } else {
            None
        }
    }

    /// Parse a layer index back out of a resource file name.
    pub fn index_from_file_name(&self, kind: LayerKind, file_name: &str) -> Option<u8> {
        let stem = file_name.strip_suffix(".png")?;
        let digits = match (kind, self.layout) {
            (LayerKind::Body, LayoutMode::Modern) => stem.strip_prefix("body_")?,
            (LayerKind::Body, LayoutMode::Legacy) => stem.strip_prefix("player_base_")?,
            _ => stem.strip_prefix(kind.as_str())?.strip_prefix('_')?,
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u8>().ok().filter(|index| *index <= 99)
    }

    /// The directory whose files hold the given layer's sprites.
    pub fn directory_for(&self, kind: LayerKind) -> String {
        match (kind, self.layout) {
            (LayerKind::Body, LayoutMode::Modern) | (LayerKind::Eyes, _) | (LayerKind::Mouth, _) => {
                join(&self.outfit_dir, kind.as_str())
            }
            _ => self.outfit_dir.clone(),
        }
    }
}

fn join(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", dir, file)
    }
}
