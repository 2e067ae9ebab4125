//! Configuration schema types for `outfits.toml`
//!
//! Defines the structure and validation rules for the outfit store
//! configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::color::parse_rgb;
use crate::outfit::{ColorProfile, LayerKind};
use crate::resolve::{LayoutMode, DEFAULT_OUTFIT_DIR};

/// How to choose the body sprite naming scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutSetting {
    /// Detect from the asset tree at startup
    #[default]
    Auto,
    /// Force `body/body_NNN.png`
    Modern,
    /// Force `player_base_N.png`
    Legacy,
}

impl LayoutSetting {
    /// The forced layout, or `None` for detection.
    pub fn forced(&self) -> Option<LayoutMode> {
        match self {
            LayoutSetting::Auto => None,
            LayoutSetting::Modern => Some(LayoutMode::Modern),
            LayoutSetting::Legacy => Some(LayoutMode::Legacy),
        }
    }
}

impl FromStr for LayoutSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(LayoutSetting::Auto),
            "modern" => Ok(LayoutSetting::Modern),
            "legacy" => Ok(LayoutSetting::Legacy),
            _ => Err(format!("unknown layout '{}', expected auto, modern or legacy", s)),
        }
    }
}

/// Where sprites live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Asset root directory, relative to the config file
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Directory under the root holding outfit sprites
    #[serde(default = "default_outfit_dir")]
    pub outfit_dir: String,
    /// Failsafe image relative to the root (generated if unset or missing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failsafe: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { root: default_root(), outfit_dir: default_outfit_dir(), failsafe: None }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_outfit_dir() -> String {
    DEFAULT_OUTFIT_DIR.to_string()
}

/// Layout selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub mode: LayoutSetting,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of composed outfits kept (0 = unbounded)
    #[serde(default)]
    pub capacity: usize,
    /// Keep decoded and tinted layer sprites in memory
    #[serde(default = "default_true")]
    pub tint_cache: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 0, tint_cache: true }
    }
}

fn default_true() -> bool {
    true
}

/// A named color profile, e.g. `[profiles.guard]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProfileConfig {
    fn entries(&self) -> [(LayerKind, Option<&String>); 3] {
        [
            (LayerKind::Dress, self.dress.as_ref()),
            (LayerKind::Hair, self.hair.as_ref()),
            (LayerKind::Detail, self.detail.as_ref()),
        ]
    }

    /// Convert to a color profile, skipping colors that fail to parse.
    ///
    /// Configs are validated on load, so nothing is skipped for a loaded
    /// config.
    pub fn to_profile(&self) -> ColorProfile {
        self.entries()
            .into_iter()
            .filter_map(|(kind, color)| Some((kind, parse_rgb(color?).ok()?)))
            .fold(ColorProfile::new(), |profile, (kind, color)| profile.with_tint(kind, color))
    }
}

/// Complete outfits.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutfitConfig {
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "profiles.guard.hair")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "outfits.toml: '{}' {}", self.field, self.message)
    }
}

impl OutfitConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let outfit_dir = self.assets.outfit_dir.trim();
        if outfit_dir.is_empty() {
            errors.push(ConfigValidationError {
                field: "assets.outfit_dir".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        } else if outfit_dir.starts_with('/') || outfit_dir.split('/').any(|part| part == "..") {
            errors.push(ConfigValidationError {
                field: "assets.outfit_dir".to_string(),
                message: "must be relative to the asset root".to_string(),
            });
        }

        for (name, profile) in &self.profiles {
            for (kind, color) in profile.entries() {
                let Some(color) = color else { continue };
                if let Err(e) = parse_rgb(color) {
                    errors.push(ConfigValidationError {
                        field: format!("profiles.{}.{}", name, kind),
                        message: format!("is not a valid color: {}", e),
                    });
                }
            }
        }

        errors
    }

    /// Look up a named profile.
    pub fn profile(&self, name: &str) -> Option<ColorProfile> {
        self.profiles.get(name).map(ProfileConfig::to_profile)
    }
}
