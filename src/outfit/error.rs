//! Error types for outfit building

use thiserror::Error;

use super::layer::LayerKind;
use crate::provider::AssetError;

/// Error when building or looking up an outfit.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum OutfitError {
    /// The mandatory body layer has no resolvable image
    #[error("No body image found for outfit {code} (body index {body})")]
    InvalidOutfitCode { code: u64, body: u8 },
    /// A layer that is never optional (head, eyes, mouth) could not be found
    #[error("Missing required {kind} layer with index {index}")]
    MissingRequiredLayer { kind: LayerKind, index: u8 },
    /// An index does not fit in its two-digit field
    #[error("{field} index {value} does not fit in an outfit code (max 99)")]
    FieldOutOfRange { field: LayerKind, value: u8 },
    /// The sprite provider failed outside of layer resolution
    #[error(transparent)]
    Asset(#[from] AssetError),
}
