//! SVG rasterisation.

use image::{Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::error::{GlowError, Result};

/// Turns SVG markup into pixels. Implementations run on background threads.
pub trait Decoder: Send + Sync {
    fn decode(&self, svg: &str) -> Result<RgbaImage>;
}

/// Rasterises SVG with resvg.
///
/// Small images are rendered larger than their intrinsic size so they stay
/// crisp when stamped with a big brush.
#[derive(Debug, Clone, Copy)]
pub struct SvgDecoder {
    /// Minimum length of the longer side of the output, in pixels.
    pub min_side: u32,
}

impl Default for SvgDecoder {
    fn default() -> Self {
        Self { min_side: 256 }
    }
}

impl Decoder for SvgDecoder {
    fn decode(&self, svg: &str) -> Result<RgbaImage> {
        let tree = usvg::Tree::from_str(svg, &usvg::Options::default()).map_err(|e| {
            GlowError::Decode {
                message: format!("Invalid SVG: {}", e),
            }
        })?;

        let size = tree.size();
        let longest = size.width().max(size.height());
        let scale = if longest > 0.0 {
            (self.min_side as f32 / longest).max(1.0)
        } else {
            1.0
        };
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| GlowError::Decode {
            message: format!("SVG has unusable size {}x{}", width, height),
        })?;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        let mut image = RgbaImage::new(width, height);
        for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(image)
    }
}
