//! PNG output for surfaces.
//!
//! Writes the physical pixel store, so a surface drawn at density 2 exports
//! at twice its logical size.

use std::path::Path;

use crate::error::{GlowError, Result};

use super::Surface;

/// Write a surface's pixels to a PNG file.
pub fn write_png(surface: &Surface, path: &Path) -> Result<()> {
    surface
        .pixels()
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| GlowError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })?;

    Ok(())
}
