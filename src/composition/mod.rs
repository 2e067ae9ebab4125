//! Outfit rendering - layering sprites onto a canvas

mod adjust;
mod blend;
mod render;

// Re-export public API
pub use adjust::{apply_adjustment, tint_image};
pub use blend::{BlendMode, UnknownBlendMode};
pub use render::compose_outfit;
