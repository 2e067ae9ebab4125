//! Outfit data model: codes, layer kinds, color profiles and errors

mod code;
mod error;
mod layer;
mod profile;

pub use code::{OutfitCode, OutfitParts, MAX_OUTFIT_CODE};
pub use error::OutfitError;
pub use layer::{LayerKind, UnknownLayerKind};
pub use profile::{parse_entry, ColorProfile, ProfileError};

/// Result type alias for outfit operations.
pub type Result<T> = std::result::Result<T, OutfitError>;
