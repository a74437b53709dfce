//! End-to-end painting sessions through the public API.

use std::path::PathBuf;
use std::sync::Arc;

use glowbrush::{
    replay, BrushShape, Canvas, CanvasConfig, Colour, Decoder, FrameRecorder, GlowError,
    ImageBrushCache, PointerEvent, ReplayOptions, ReplaySummary, Result, Script, StrokeOutcome,
    StrokeState,
};
use image::RgbaImage;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const RED: Colour = Colour::rgb(255, 0, 0);

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn seeded(seed: u32) -> Canvas {
    Canvas::new(&CanvasConfig {
        seed: Some(seed),
        ..Default::default()
    })
}

#[test]
fn test_add_colour_keeps_cursor() {
    let mut canvas = seeded(1);
    assert!(canvas.add_colour(RED));
    assert_eq!(canvas.palette().colours(), &[Colour::BLACK, RED]);
    assert_eq!(canvas.palette().cursor(), 0);

    // Same value, different spelling.
    assert!(!canvas.add_colour("#FF0000".parse().unwrap()));
}

#[test]
fn test_removing_current_last_colour_resets() {
    let mut canvas = seeded(1);
    canvas.add_colour(RED);
    canvas.pointer(PointerEvent::Down { x: 10.0, y: 10.0, t: 0 });
    assert_eq!(canvas.palette().cursor(), 1);

    canvas.remove_colour(RED);
    assert_eq!(canvas.palette().colours(), &[Colour::BLACK]);
    assert_eq!(canvas.palette().cursor(), 0);
}

#[test]
fn test_stroke_pacing() {
    let mut canvas = seeded(2);
    canvas.set_stroke_delay(100);

    assert_eq!(
        canvas.pointer(PointerEvent::Down { x: 100.0, y: 100.0, t: 0 }),
        StrokeOutcome::Stamped
    );
    assert_eq!(
        canvas.pointer(PointerEvent::Move { x: 110.0, y: 100.0, t: 50 }),
        StrokeOutcome::Paced
    );
    assert_eq!(canvas.timing().last_stamp(), Some(0));
    assert_eq!(
        canvas.pointer(PointerEvent::Move { x: 120.0, y: 100.0, t: 120 }),
        StrokeOutcome::Stamped
    );
    assert_eq!(canvas.timing().last_stamp(), Some(120));
    assert_eq!(canvas.stroke_state(), StrokeState::Stroking);
}

#[test]
fn test_image_brush_without_upload() {
    let mut canvas = seeded(3);
    canvas.set_shape(BrushShape::Image);
    canvas.set_glow(1.0);

    canvas.pointer(PointerEvent::Down { x: 100.0, y: 100.0, t: 0 });
    canvas.pointer(PointerEvent::Move { x: 140.0, y: 100.0, t: 20 });

    assert!(canvas.surface().is_blank());
}

#[test]
fn test_same_seed_paints_same_pixels() {
    let script = Script::load(&fixture("strokes.yaml")).unwrap();

    let mut first = seeded(77);
    let mut second = seeded(77);
    replay(&mut first, &script, None, ReplayOptions::default()).unwrap();
    replay(&mut second, &script, None, ReplayOptions::default()).unwrap();

    assert!(first.surface().pixels() == second.surface().pixels());
}

#[test]
fn test_fixture_script_replays() {
    let script = Script::load(&fixture("strokes.yaml")).unwrap();
    let mut canvas = seeded(5);

    let summary = replay(&mut canvas, &script, None, ReplayOptions::default()).unwrap();

    assert_eq!(
        summary,
        ReplaySummary {
            stamps: 6,
            paced: 1,
            ignored: 0,
            strokes: 2,
            actions: 5,
            rejected_uploads: 0,
        }
    );
    assert_eq!(canvas.brush().shape, BrushShape::Image);
    assert_eq!(canvas.images().len(), 2);
    assert!(!canvas.surface().is_blank());
}

#[test]
fn test_density_scales_output() {
    let mut canvas = Canvas::new(&CanvasConfig {
        canvas: glowbrush::SurfaceConfig {
            width: 150,
            height: 100,
            density: 2.0,
        },
        seed: Some(4),
        ..Default::default()
    });
    canvas.pointer(PointerEvent::Down { x: 75.0, y: 50.0, t: 0 });

    let dir = tempdir().unwrap();
    let path = dir.path().join("hidpi.png");
    canvas.export_png(&path).unwrap();

    let image = image::open(&path).unwrap();
    assert_eq!((image.width(), image.height()), (300, 200));
    assert_eq!(canvas.surface().logical_size(), (150, 100));
}

#[test]
fn test_recording_replay() {
    let script = Script::load(&fixture("strokes.yaml")).unwrap();
    let mut canvas = seeded(6);
    let mut recorder = FrameRecorder::new(50);

    replay(&mut canvas, &script, Some(&mut recorder), ReplayOptions::default()).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("replay.gif");
    let ticks = recorder.finish(canvas.surface(), &path).unwrap();

    // 170 ms of script at 20 ms per frame, plus the closing frame.
    assert_eq!(ticks, 10);
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

/// A decoder that never succeeds.
struct Broken;

impl Decoder for Broken {
    fn decode(&self, _svg: &str) -> Result<RgbaImage> {
        Err(GlowError::Decode {
            message: "broken".to_string(),
        })
    }
}

#[test]
fn test_failed_decodes_draw_nothing() {
    let mut canvas = seeded(8).with_image_cache(ImageBrushCache::with_decoder(Arc::new(Broken)));
    assert!(canvas.upload_image("image/svg+xml", "<svg/>"));
    assert_eq!(canvas.wait_for_images(), 0);

    canvas.pointer(PointerEvent::Down { x: 100.0, y: 100.0, t: 0 });
    assert!(canvas.surface().is_blank());
}
