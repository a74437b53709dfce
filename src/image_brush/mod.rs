//! Image brushes built from an uploaded SVG.
//!
//! The SVG is tinted once per palette colour by rewriting its fill
//! attributes, and each tint is rasterised in the background. See
//! [`ImageBrushCache`] for the lifecycle.

mod cache;
mod decode;
mod tint;

pub use cache::ImageBrushCache;
pub use decode::{Decoder, SvgDecoder};
pub use tint::tint_svg;

/// MIME type accepted for brush uploads.
pub const SVG_MIME: &str = "image/svg+xml";

/// Check whether an upload of the given MIME type may be used as a brush.
pub fn accepts_mime(mime: &str) -> bool {
    mime.trim().eq_ignore_ascii_case(SVG_MIME)
}
