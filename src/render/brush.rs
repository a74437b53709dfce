//! Brush renderer - draws one stamp onto a surface.
//!
//! A stamp is three layers drawn back to front. Each layer is smaller and
//! more transparent than the previous one, gets its own colour variation
//! and is nudged by up to one pixel in each direction, which gives the
//! stamp a slightly uneven, volumetric look. The whole stamp glows with a
//! blurred shadow in the current palette colour.

use image::RgbaImage;
use tracing::debug;

use crate::types::{vary_colour, BrushConfig, BrushShape, Colour, RandomSource};

use super::surface::{CompositeMode, Surface};

/// Maximum centre offset of a layer, in logical pixels.
const LAYER_JITTER: f32 = 1.0;

/// Corner radius of a rounded-rectangle layer, as a divisor of its shorter side.
const CORNER_DIVISOR: f32 = 6.0;

/// Lookup of tinted brush images by colour.
pub trait TintedImages {
    /// The image tinted with `colour`, if it is ready.
    fn tinted(&self, colour: Colour) -> Option<&RgbaImage>;
}

/// An image source with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl TintedImages for NoImages {
    fn tinted(&self, _colour: Colour) -> Option<&RgbaImage> {
        None
    }
}

/// Draws stamps for a brush configuration.
pub struct BrushRenderer<'a> {
    config: &'a BrushConfig,
    images: &'a dyn TintedImages,
}

impl<'a> BrushRenderer<'a> {
    /// Create a renderer for shape brushes only.
    pub fn new(config: &'a BrushConfig) -> Self {
        Self {
            config,
            images: &NoImages,
        }
    }

    /// Use `images` for image-shaped brushes.
    pub fn with_images(mut self, images: &'a dyn TintedImages) -> Self {
        self.images = images;
        self
    }

    /// Draw one stamp centred at logical position `(x, y)` in `colour`.
    ///
    /// The surface drawing state is left exactly as it was found.
    pub fn render(&self, surface: &mut Surface, x: f32, y: f32, colour: Colour, rng: &mut dyn RandomSource) {
        let config = self.config;
        surface.save();
        surface.set_shadow(colour, config.glow_radius());

        // One variation draw precedes the layers, which then draw their own.
        let _base_fill = vary_colour(colour, config.colour_variation, rng);

        for layer in config.layers() {
            surface.set_global_alpha(layer.opacity);
            let fill = vary_colour(colour, config.colour_variation, rng);
            let cx = x + rng.range(-LAYER_JITTER, LAYER_JITTER);
            let cy = y + rng.range(-LAYER_JITTER, LAYER_JITTER);
            let (w, h) = (layer.width, layer.height);
            let (left, top) = (cx - w / 2.0, cy - h / 2.0);

            match config.shape {
                BrushShape::Disc => surface.fill_ellipse(cx, cy, w / 2.0, h / 2.0, fill),
                BrushShape::Rectangle => surface.fill_rect(left, top, w, h, fill),
                BrushShape::RoundedRectangle => {
                    let radius = w.min(h) / CORNER_DIVISOR;
                    surface.fill_round_rect(left, top, w, h, radius, fill);
                }
                BrushShape::Image => match self.images.tinted(colour) {
                    Some(image) => {
                        let previous = surface.state().composite;
                        surface.set_composite(CompositeMode::Multiply);
                        surface.draw_image(image, left, top, w, h);
                        surface.set_composite(previous);
                    }
                    None => {
                        debug!(layer = layer.index, %colour, "no tinted image ready, skipping layer");
                    }
                },
            }
        }

        surface.restore();
    }
}
