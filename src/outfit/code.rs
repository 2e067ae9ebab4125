//! Outfit code encoding
//!
//! An outfit code packs five two-digit layer indices into one decimal
//! number, least significant first: `DDRRHHSSBB` reads as detail, hair,
//! head, dress, body.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::OutfitError;
use super::layer::LayerKind;

/// Largest code whose fields all fit in two digits.
pub const MAX_OUTFIT_CODE: u64 = 99_99_99_99_99;

/// A packed outfit code as sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutfitCode(pub u64);

impl OutfitCode {
    /// The canonical default outfit, used by the failsafe path.
    pub const DEFAULT: OutfitCode = OutfitCode(0);

    /// Split the code into its layer indices.
    ///
    /// Digits above the tenth are ignored.
    pub fn decode(self) -> OutfitParts {
        let mut value = self.0;
        let mut next = || {
            let field = (value % 100) as u8;
            value /= 100;
            field
        };

        let body = next();
        let dress = next();
        let head = next();
        let hair = next();
        let detail = next();
        OutfitParts { body, dress, head, hair, detail }
    }
}

impl fmt::Display for OutfitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OutfitCode {
    fn from(value: u64) -> Self {
        OutfitCode(value)
    }
}

/// Decoded layer indices of an outfit code. Each field is `0..=99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OutfitParts {
    pub body: u8,
    pub dress: u8,
    pub head: u8,
    pub hair: u8,
    pub detail: u8,
}

impl OutfitParts {
    /// Pack the indices back into a code.
    ///
    /// # Errors
    ///
    /// Returns `OutfitError::FieldOutOfRange` if any index exceeds 99.
    pub fn encode(&self) -> Result<OutfitCode, OutfitError> {
        let mut code = 0u64;
        // Most significant field first.
        for kind in LayerKind::DRAW_ORDER.iter().rev() {
            let value = self.index(*kind).unwrap_or(0);
            if value > 99 {
                return Err(OutfitError::FieldOutOfRange { field: *kind, value });
            }
            code = code * 100 + value as u64;
        }
        Ok(OutfitCode(code))
    }

    /// The index stored for a layer, or `None` for layers that are not
    /// part of an outfit code (eyes, mouth).
    pub fn index(&self, kind: LayerKind) -> Option<u8> {
        match kind {
            LayerKind::Body => Some(self.body),
            LayerKind::Dress => Some(self.dress),
            LayerKind::Head => Some(self.head),
            LayerKind::Hair => Some(self.hair),
            LayerKind::Detail => Some(self.detail),
            LayerKind::Eyes | LayerKind::Mouth => None,
        }
    }
}
