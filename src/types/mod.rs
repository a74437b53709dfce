//! Core domain types for glowbrush.
//!
//! This module contains the value types the drawing engine is built from:
//! - `Colour` - RGBA colour values
//! - `Palette` - the cycling colour palette and its cursor
//! - `BrushConfig` - brush shape, size, variation and glow
//! - `vary_colour` - random per-channel colour perturbation

mod brush;
mod colour;
mod palette;
mod random;
mod variation;

pub use brush::{
    BrushConfig, BrushShape, Layer, GLOW_STEP, LAYER_COUNT, LAYER_FADE, LAYER_SHRINK,
    MAX_BRUSH_SIZE, MAX_VARIATION, MIN_BRUSH_SIZE,
};
pub use colour::Colour;
pub use palette::Palette;
pub use random::{RandomSource, XorShift32};
pub use variation::vary_colour;
