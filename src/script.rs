//! Stroke scripts.
//!
//! A script is a YAML list of steps replayed against a [`Canvas`]. Each step
//! is either a pointer event (tagged `event`) or a host control action
//! (tagged `action`):
//!
//! ```yaml
//! - { action: add-colour, colour: "#ff0000" }
//! - { action: shape, shape: rounded-rectangle }
//! - { event: down, x: 40, y: 40, t: 0 }
//! - { event: move, x: 60, y: 42, t: 16 }
//! - { event: up, t: 32 }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::error::{GlowError, Result};
use crate::image_brush::SVG_MIME;
use crate::render::FrameRecorder;
use crate::stroke::{PointerEvent, StrokeOutcome};
use crate::types::{BrushShape, Colour};

/// A host control applied between pointer events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum HostAction {
    AddColour { colour: Colour },
    RemoveColour { colour: Colour },
    SelectColour { index: usize },
    Shape { shape: BrushShape },
    Size { width: f32, height: f32 },
    Variation { amount: f32 },
    Glow { amount: f32 },
    Delay { ms: u64 },
    Resize { width: u32, height: u32 },
    Density { density: f32 },
    Clear,
    /// Upload a brush image file. Relative paths resolve against the script.
    Image { path: PathBuf },
}

/// One script step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Pointer(PointerEvent),
    Action(HostAction),
}

/// A parsed stroke script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a script from YAML.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| GlowError::Parse {
            message: format!("Invalid stroke script: {}", e),
            help: Some(
                "Each step needs an `event` (down, move, up, leave) or an `action` tag".to_string(),
            ),
        })
    }

    /// Load a script file, resolving image paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GlowError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read script: {}", e),
        })?;

        let mut script = Self::parse(&content)?;
        if let Some(dir) = path.parent() {
            for step in &mut script.steps {
                if let Step::Action(HostAction::Image { path }) = step {
                    if path.is_relative() {
                        *path = dir.join(&*path);
                    }
                }
            }
        }
        Ok(script)
    }

    /// Number of pointer events in the script.
    pub fn pointer_events(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, Step::Pointer(_)))
            .count()
    }
}

/// Replay behaviour.
#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    /// Block for image decodes after every upload and palette change, so
    /// the result does not depend on decode timing.
    pub wait_for_images: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            wait_for_images: true,
        }
    }
}

/// Counts collected while replaying a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub stamps: usize,
    pub paced: usize,
    pub ignored: usize,
    pub strokes: usize,
    pub actions: usize,
    pub rejected_uploads: usize,
}

/// Replay `script` on `canvas`, feeding `recorder` as time advances.
pub fn replay(
    canvas: &mut Canvas,
    script: &Script,
    mut recorder: Option<&mut FrameRecorder>,
    options: ReplayOptions,
) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for step in &script.steps {
        match step {
            Step::Pointer(event) => {
                if let Some(recorder) = recorder.as_deref_mut() {
                    recorder.advance_to(canvas.surface(), event.time());
                }
                match canvas.pointer(*event) {
                    StrokeOutcome::Stamped => summary.stamps += 1,
                    StrokeOutcome::Paced => summary.paced += 1,
                    StrokeOutcome::Ignored => summary.ignored += 1,
                    StrokeOutcome::Ended => summary.strokes += 1,
                }
            }
            Step::Action(action) => {
                let recording = recorder.as_deref().is_some_and(|r| r.stored_frames() > 0);
                if recording && matches!(action, HostAction::Resize { .. } | HostAction::Density { .. }) {
                    return Err(GlowError::Parse {
                        message: "Cannot change the surface size while recording".to_string(),
                        help: Some("Move resize and density steps before the first pointer event".to_string()),
                    });
                }
                summary.actions += 1;
                if !apply(canvas, action, options)? {
                    summary.rejected_uploads += 1;
                }
            }
        }
    }

    debug!(?summary, "replayed stroke script");
    Ok(summary)
}

/// Apply one host action. Returns `false` for a rejected upload.
fn apply(canvas: &mut Canvas, action: &HostAction, options: ReplayOptions) -> Result<bool> {
    let mut rebuilt = false;
    match action {
        HostAction::AddColour { colour } => rebuilt = canvas.add_colour(*colour),
        HostAction::RemoveColour { colour } => rebuilt = canvas.remove_colour(*colour),
        HostAction::SelectColour { index } => {
            if !canvas.select_colour(*index) {
                warn!(index, len = canvas.palette().len(), "palette index out of range");
            }
        }
        HostAction::Shape { shape } => canvas.set_shape(*shape),
        HostAction::Size { width, height } => canvas.set_brush_size(*width, *height),
        HostAction::Variation { amount } => canvas.set_colour_variation(*amount),
        HostAction::Glow { amount } => canvas.set_glow(*amount),
        HostAction::Delay { ms } => canvas.set_stroke_delay(*ms),
        HostAction::Resize { width, height } => canvas.resize(*width, *height),
        HostAction::Density { density } => canvas.set_density(*density),
        HostAction::Clear => canvas.clear(),
        HostAction::Image { path } => {
            let svg = std::fs::read_to_string(path).map_err(|e| GlowError::Io {
                path: path.clone(),
                message: format!("Failed to read brush image: {}", e),
            })?;
            if !canvas.upload_image(mime_for_path(path), &svg) {
                warn!(path = %path.display(), "brush image rejected");
                return Ok(false);
            }
            rebuilt = true;
        }
    }

    if rebuilt && options.wait_for_images && canvas.images().has_source() {
        canvas.wait_for_images();
    }
    Ok(true)
}

/// MIME type of a brush upload, from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("svg") => SVG_MIME,
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "application/octet-stream",
    }
}
