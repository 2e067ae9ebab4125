//! Layer kinds and their drawing rules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One visual component of a character sprite.
///
/// Variant order is the canonical ordering used for color profiles; the
/// composed draw order is [`LayerKind::DRAW_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Body,
    Dress,
    Head,
    Hair,
    Detail,
    Eyes,
    Mouth,
}

impl LayerKind {
    /// Layers of a composed outfit, bottom to top.
    ///
    /// Later layers occlude earlier ones. Changing this order changes the
    /// rendered appearance of every outfit.
    pub const DRAW_ORDER: [LayerKind; 5] =
        [LayerKind::Body, LayerKind::Dress, LayerKind::Head, LayerKind::Hair, LayerKind::Detail];

    /// All known layer kinds.
    pub const ALL: [LayerKind; 7] = [
        LayerKind::Body,
        LayerKind::Dress,
        LayerKind::Head,
        LayerKind::Hair,
        LayerKind::Detail,
        LayerKind::Eyes,
        LayerKind::Mouth,
    ];

    /// Lowercase name, also used in resource file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Body => "body",
            LayerKind::Dress => "dress",
            LayerKind::Head => "head",
            LayerKind::Hair => "hair",
            LayerKind::Detail => "detail",
            LayerKind::Eyes => "eyes",
            LayerKind::Mouth => "mouth",
        }
    }

    /// Whether index `0` means "no layer" for this kind.
    pub fn is_optional(&self) -> bool {
        matches!(self, LayerKind::Dress | LayerKind::Hair | LayerKind::Detail)
    }

    /// Whether the compositor applies a color profile tint to this kind.
    pub fn is_tintable(&self) -> bool {
        self.is_optional()
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown layer name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layer kind '{0}', expected one of body, dress, head, hair, detail, eyes, mouth")]
pub struct UnknownLayerKind(pub String);

impl FromStr for LayerKind {
    type Err = UnknownLayerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        LayerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| UnknownLayerKind(s.to_string()))
    }
}
