//! Per-layer tint profiles

use image::Rgb;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::layer::{LayerKind, UnknownLayerKind};
use crate::color::{parse_rgb, to_hex, ColorError};

/// Error when parsing a color profile string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// Entry is not of the form `kind=color`
    #[error("invalid color profile entry '{0}', expected kind=color")]
    MalformedEntry(String),
    #[error(transparent)]
    UnknownKind(#[from] UnknownLayerKind),
    /// Only dress, hair and detail layers take a tint
    #[error("layer '{0}' cannot be tinted")]
    NotTintable(LayerKind),
    #[error("invalid color for layer '{kind}': {source}")]
    Color {
        kind: LayerKind,
        #[source]
        source: ColorError,
    },
}

/// Immutable mapping from layer kind to an optional tint.
///
/// Layers without an entry are drawn untinted. Two profiles are equal for
/// caching purposes iff their canonical strings are equal; the `BTreeMap`
/// keeps entries in `LayerKind` order so the canonical form is stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ColorProfile {
    tints: BTreeMap<LayerKind, Rgb<u8>>,
}

impl ColorProfile {
    /// The profile with no tints.
    pub const PLAIN: ColorProfile = ColorProfile { tints: BTreeMap::new() };

    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this profile with `kind` tinted.
    ///
    /// Layers that are never tinted (body, head, eyes, mouth) are left out,
    /// so they cannot change the canonical form.
    pub fn with_tint(mut self, kind: LayerKind, color: Rgb<u8>) -> Self {
        if kind.is_tintable() {
            self.tints.insert(kind, color);
        } else {
            log::debug!("ignoring tint for untintable {} layer", kind);
        }
        self
    }

    /// The tint for a layer, if any.
    pub fn tint(&self, kind: LayerKind) -> Option<Rgb<u8>> {
        self.tints.get(&kind).copied()
    }

    /// Whether no layer is tinted.
    pub fn is_plain(&self) -> bool {
        self.tints.is_empty()
    }

    /// Stable string form used in cache signatures.
    ///
    /// `plain` for an empty profile, otherwise `kind=#rrggbb` pairs joined
    /// by `,` in layer order.
    pub fn canonical(&self) -> String {
        if self.tints.is_empty() {
            return "plain".to_string();
        }
        self.tints
            .iter()
            .map(|(kind, color)| format!("{}={}", kind, to_hex(*color)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ColorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for ColorProfile {
    type Err = ProfileError;

    /// Parse `dress=#ff0000,hair=navy`. `plain` and the empty string give
    /// the plain profile. Later entries for the same layer win.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("plain") {
            return Ok(ColorProfile::PLAIN);
        }

        let mut profile = ColorProfile::new();
        for entry in s.split(',') {
            let (kind, color) = parse_entry(entry)?;
            profile.tints.insert(kind, color);
        }
        Ok(profile)
    }
}

/// Parse a single `kind=color` entry.
pub fn parse_entry(entry: &str) -> Result<(LayerKind, Rgb<u8>), ProfileError> {
    let (kind, color) =
        entry.split_once('=').ok_or_else(|| ProfileError::MalformedEntry(entry.to_string()))?;
    let kind: LayerKind = kind.parse()?;
    if !kind.is_tintable() {
        return Err(ProfileError::NotTintable(kind));
    }
    let color = parse_rgb(color).map_err(|source| ProfileError::Color { kind, source })?;
    Ok((kind, color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_canonical() {
        assert_eq!(ColorProfile::PLAIN.canonical(), "plain");
        assert!(ColorProfile::new().is_plain());
    }

    #[test]
    fn test_canonical_is_order_independent() {
        let a = ColorProfile::new()
            .with_tint(LayerKind::Hair, Rgb([0, 0, 255]))
            .with_tint(LayerKind::Dress, Rgb([255, 0, 0]));
        let b = ColorProfile::new()
            .with_tint(LayerKind::Dress, Rgb([255, 0, 0]))
            .with_tint(LayerKind::Hair, Rgb([0, 0, 255]));

        assert_eq!(a.canonical(), "dress=#ff0000,hair=#0000ff");
        assert_eq!(a.canonical(), b.canonical());
        assert_eq!(a, b);
    }

    #[test]
    fn test_untintable_layers_do_not_change_canonical() {
        let red = Rgb([255, 0, 0]);
        let profile = ColorProfile::new()
            .with_tint(LayerKind::Body, red)
            .with_tint(LayerKind::Head, red)
            .with_tint(LayerKind::Eyes, red)
            .with_tint(LayerKind::Mouth, red);

        assert!(profile.is_plain());
        assert_eq!(profile.canonical(), "plain");
        assert_eq!(profile, ColorProfile::PLAIN);

        let hair = ColorProfile::new().with_tint(LayerKind::Hair, red);
        assert_eq!(hair.clone().with_tint(LayerKind::Body, red).canonical(), hair.canonical());
    }

    #[test]
    fn test_parse_profile() {
        let profile: ColorProfile = "hair=navy, dress=#f00".parse().unwrap();
        assert_eq!(profile.tint(LayerKind::Dress), Some(Rgb([255, 0, 0])));
        assert_eq!(profile.tint(LayerKind::Hair), Some(Rgb([0, 0, 128])));
        assert_eq!(profile.tint(LayerKind::Detail), None);
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!("plain".parse::<ColorProfile>().unwrap(), ColorProfile::PLAIN);
        assert_eq!("".parse::<ColorProfile>().unwrap(), ColorProfile::PLAIN);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("dress".parse::<ColorProfile>(), Err(ProfileError::MalformedEntry(_))));
        assert!(matches!("cape=red".parse::<ColorProfile>(), Err(ProfileError::UnknownKind(_))));
        assert_eq!(
            "body=red".parse::<ColorProfile>(),
            Err(ProfileError::NotTintable(LayerKind::Body))
        );
        assert!(matches!(
            "hair=#zz".parse::<ColorProfile>(),
            Err(ProfileError::Color { kind: LayerKind::Hair, .. })
        ));
    }
}
