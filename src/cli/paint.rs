//! Paint command implementation.
//!
//! Replays a stroke script on a fresh canvas and writes the result as PNG,
//! optionally recording the replay as an animated GIF.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::canvas::Canvas;
use crate::config::{CanvasConfig, CONFIG_FILENAME};
use crate::error::{GlowError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::FrameRecorder;
use crate::script::{mime_for_path, replay, ReplayOptions, Script};

/// Replay a stroke script and write the painted canvas
#[derive(Args, Debug)]
pub struct PaintArgs {
    /// Stroke script (YAML list of pointer events and actions)
    pub script: PathBuf,

    /// Canvas configuration (default: ./glowbrush.yaml if present)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// SVG brush image, overriding the configured one
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Output PNG path
    #[arg(long, short, default_value = "canvas.png")]
    pub output: PathBuf,

    /// Also record the replay as an animated GIF
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Recording frame rate
    #[arg(long, default_value = "30")]
    pub fps: u32,

    /// Seed for colour variation and jitter
    #[arg(long)]
    pub seed: Option<u32>,

    /// Don't wait for brush image decodes; stamps drawn before a tint is
    /// ready are skipped
    #[arg(long)]
    pub no_wait: bool,
}

pub fn run(args: PaintArgs, printer: &Printer) -> Result<()> {
    let mut config = load_config(args.config.as_deref(), printer)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut canvas = Canvas::new(&config);
    let (width, height) = canvas.surface().logical_size();
    printer.info("Canvas", &format!("{}x{} @ {}x", width, height, canvas.surface().density()));

    if let Some(image) = args.image.as_ref().or(config.image.as_ref()) {
        upload(&mut canvas, image, !args.no_wait, printer)?;
    }

    let script = Script::load(&args.script)?;
    printer.status(
        "Painting",
        &format!(
            "{} ({})",
            display_path(&args.script),
            plural(script.pointer_events(), "event", "events")
        ),
    );

    let mut recorder = args.record.as_ref().map(|_| FrameRecorder::new(args.fps));
    let options = ReplayOptions {
        wait_for_images: !args.no_wait,
    };
    let summary = replay(&mut canvas, &script, recorder.as_mut(), options)?;

    ensure_parent(&args.output)?;
    canvas.export_png(&args.output)?;
    printer.success("Wrote", &display_path(&args.output));

    if let (Some(path), Some(recorder)) = (&args.record, recorder) {
        ensure_parent(path)?;
        let fps = recorder.fps();
        let ticks = recorder.finish(canvas.surface(), path)?;
        printer.success(
            "Recorded",
            &format!(
                "{} ({} at {} fps)",
                display_path(path),
                plural(ticks as usize, "frame", "frames"),
                fps
            ),
        );
    }

    if summary.rejected_uploads > 0 {
        printer.warning(
            "Skipped",
            &plural(summary.rejected_uploads, "non-SVG upload", "non-SVG uploads"),
        );
    }
    printer.info(
        "Summary",
        &format!(
            "{}, {} paced, {}",
            plural(summary.stamps, "stamp", "stamps"),
            summary.paced,
            plural(summary.strokes, "stroke", "strokes")
        ),
    );

    Ok(())
}

/// Load the given config, or glowbrush.yaml from the working directory,
/// or fall back to defaults.
fn load_config(path: Option<&Path>, printer: &Printer) -> Result<CanvasConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let local = PathBuf::from(CONFIG_FILENAME);
            if !local.exists() {
                return Ok(CanvasConfig::default());
            }
            local
        }
    };
    printer.status("Loading", &display_path(&path));
    CanvasConfig::load(&path)
}

fn upload(canvas: &mut Canvas, path: &Path, wait: bool, printer: &Printer) -> Result<()> {
    let svg = fs::read_to_string(path).map_err(|e| GlowError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read brush image: {}", e),
    })?;

    if !canvas.upload_image(mime_for_path(path), &svg) {
        return Err(GlowError::Config {
            message: format!("{} is not a usable SVG brush", path.display()),
            help: Some("Brush images must be non-empty .svg files".to_string()),
        });
    }
    printer.status("Decoding", &display_path(path));

    if wait {
        let ready = canvas.wait_for_images();
        let colours = canvas.palette().len();
        if ready < colours {
            printer.warning(
                "Decoded",
                &format!("{} of {}", ready, plural(colours, "tint", "tints")),
            );
        }
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| GlowError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create output directory: {}", e),
            })
        }
        _ => Ok(()),
    }
}
