//! Brush shape and configuration.
//!
//! A stamp is drawn as three stacked layers, each a little smaller and more
//! transparent than the one behind it. `BrushConfig::layers` computes that
//! geometry so the renderer and its tests share one definition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GlowError, Result};

/// Number of layers composing one stamp.
pub const LAYER_COUNT: usize = 3;

/// Fraction of the brush size removed per layer.
pub const LAYER_SHRINK: f32 = 0.15;

/// Opacity removed per layer.
pub const LAYER_FADE: f32 = 0.2;

/// Largest brush width or height.
pub const MAX_BRUSH_SIZE: f32 = 2000.0;

/// Smallest brush width or height.
pub const MIN_BRUSH_SIZE: f32 = 1.0;

/// Largest colour variation amount.
pub const MAX_VARIATION: f32 = 60.0;

/// Glow slider step.
pub const GLOW_STEP: f32 = 0.1;

/// The shape stamped by the brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrushShape {
    /// Filled ellipse.
    #[default]
    Disc,
    /// Filled axis-aligned rectangle.
    Rectangle,
    /// Rectangle with corners rounded by a sixth of its shorter side.
    RoundedRectangle,
    /// The uploaded SVG image, tinted per palette colour.
    Image,
}

impl BrushShape {
    /// All shapes, in display order.
    pub const ALL: [BrushShape; 4] = [
        BrushShape::Disc,
        BrushShape::Rectangle,
        BrushShape::RoundedRectangle,
        BrushShape::Image,
    ];

    /// Kebab-case name as used in config files and scripts.
    pub fn name(self) -> &'static str {
        match self {
            BrushShape::Disc => "disc",
            BrushShape::Rectangle => "rectangle",
            BrushShape::RoundedRectangle => "rounded-rectangle",
            BrushShape::Image => "image",
        }
    }
}

impl fmt::Display for BrushShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrushShape {
    type Err = GlowError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name() == s.trim())
            .ok_or_else(|| GlowError::Parse {
                message: format!("Unknown brush shape: {}", s),
                help: Some("Use disc, rectangle, rounded-rectangle, or image".to_string()),
            })
    }
}

/// Geometry of one layer within a stamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    /// Layer index, 0 is the back (largest) layer.
    pub index: usize,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
}

/// Brush settings mutated by the host controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub shape: BrushShape,

    /// Stamp width in logical pixels.
    pub width: f32,

    /// Stamp height in logical pixels.
    pub height: f32,

    /// Maximum per-channel colour perturbation.
    pub colour_variation: f32,

    /// Glow blur radius as a fraction of the larger brush dimension.
    pub glow: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            shape: BrushShape::Disc,
            width: 20.0,
            height: 20.0,
            colour_variation: 30.0,
            glow: 0.1,
        }
    }
}

impl BrushConfig {
    /// Set the stamp size, clamped to the supported range.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = clamp_size(width);
        self.height = clamp_size(height);
    }

    /// Set the colour variation, clamped to `[0, 60]`.
    pub fn set_colour_variation(&mut self, amount: f32) {
        self.colour_variation = if amount.is_finite() {
            amount.clamp(0.0, MAX_VARIATION)
        } else {
            0.0
        };
    }

    /// Set the glow intensity, clamped to `[0, 1]` and snapped to 0.1 steps.
    pub fn set_glow(&mut self, glow: f32) {
        let glow = if glow.is_finite() { glow.clamp(0.0, 1.0) } else { 0.0 };
        self.glow = (glow / GLOW_STEP).round() * GLOW_STEP;
    }

    /// Clamp every field into its supported range.
    pub fn normalized(mut self) -> Self {
        self.set_size(self.width, self.height);
        self.set_colour_variation(self.colour_variation);
        self.set_glow(self.glow);
        self
    }

    /// Shadow blur radius for the glow, in logical pixels.
    pub fn glow_radius(&self) -> f32 {
        self.width.max(self.height) * self.glow
    }

    /// Geometry of each layer, back to front.
    pub fn layers(&self) -> [Layer; LAYER_COUNT] {
        std::array::from_fn(|index| {
            let scale = 1.0 - index as f32 * LAYER_SHRINK;
            Layer {
                index,
                width: self.width * scale,
                height: self.height * scale,
                opacity: 1.0 - index as f32 * LAYER_FADE,
            }
        })
    }
}

fn clamp_size(size: f32) -> f32 {
    if size.is_finite() {
        size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
    } else {
        MIN_BRUSH_SIZE
    }
}
