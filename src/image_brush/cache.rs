//! Cache of tinted brush images keyed by palette colour.
//!
//! Tinting is synchronous text substitution, but turning the tinted SVG
//! into pixels happens on background threads. Finished images are handed
//! back over a channel and only enter the cache when the owner calls
//! [`ImageBrushCache::poll`], so rendering always sees a plain lookup that
//! may come back empty.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::Result;
use crate::render::TintedImages;
use crate::types::Colour;

use super::decode::{Decoder, SvgDecoder};
use super::tint::tint_svg;

/// Longest a blocking wait gives a single decode before giving up on it.
const DECODE_TIMEOUT: Duration = Duration::from_secs(10);

/// A decode result tagged with the rebuild it belongs to.
struct Decoded {
    generation: u64,
    colour: Colour,
    result: Result<RgbaImage>,
}

/// Uploaded SVG brush and its per-colour tinted renderings.
pub struct ImageBrushCache {
    source: Option<String>,
    images: HashMap<Colour, RgbaImage>,
    decoder: Arc<dyn Decoder>,
    generation: u64,
    pending: usize,
    sender: Sender<Decoded>,
    receiver: Receiver<Decoded>,
}

impl ImageBrushCache {
    /// Create an empty cache that decodes with resvg.
    pub fn new() -> Self {
        Self::with_decoder(Arc::new(SvgDecoder::default()))
    }

    /// Create an empty cache with a custom decoder.
    pub fn with_decoder(decoder: Arc<dyn Decoder>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source: None,
            images: HashMap::new(),
            decoder,
            generation: 0,
            pending: 0,
            sender,
            receiver,
        }
    }

    /// Replace the brush image and start decoding a tint for every colour.
    ///
    /// Empty markup is ignored and leaves the current image in place.
    pub fn load(&mut self, svg: &str, palette: &[Colour]) {
        if svg.trim().is_empty() {
            debug!("ignoring empty brush image");
            return;
        }
        self.source = Some(svg.to_string());
        self.rebuild(palette);
    }

    /// Drop every tinted image and start decoding one per palette colour
    /// from the stored source. Decodes still in flight from before are
    /// discarded when they arrive.
    pub fn rebuild(&mut self, palette: &[Colour]) {
        self.images.clear();
        self.generation += 1;
        self.pending = 0;

        let Some(source) = &self.source else {
            return;
        };

        for &colour in palette {
            let tinted = tint_svg(source, colour);
            let decoder = Arc::clone(&self.decoder);
            let sender = self.sender.clone();
            let generation = self.generation;

            let spawned = thread::Builder::new()
                .name("brush-decode".to_string())
                .spawn(move || {
                    let result = decoder.decode(&tinted);
                    // The cache may have been dropped meanwhile.
                    let _ = sender.send(Decoded {
                        generation,
                        colour,
                        result,
                    });
                });

            match spawned {
                Ok(_) => self.pending += 1,
                Err(e) => warn!(%colour, error = %e, "could not start brush decode"),
            }
        }
        debug!(
            generation = self.generation,
            pending = self.pending,
            "rebuilding brush image cache"
        );
    }

    /// Collect finished decodes without blocking.
    ///
    /// Returns the number of images added to the cache.
    pub fn poll(&mut self) -> usize {
        let mut added = 0;
        while let Ok(decoded) = self.receiver.try_recv() {
            if self.accept(decoded) {
                added += 1;
            }
        }
        added
    }

    /// Block until every decode from the latest rebuild has arrived.
    ///
    /// Returns the number of images added to the cache.
    pub fn wait_pending(&mut self) -> usize {
        let mut added = 0;
        while self.pending > 0 {
            match self.receiver.recv_timeout(DECODE_TIMEOUT) {
                Ok(decoded) => {
                    if self.accept(decoded) {
                        added += 1;
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    warn!(pending = self.pending, "gave up waiting for brush decodes");
                    self.pending = 0;
                }
            }
        }
        added
    }

    /// Whether a brush image has been uploaded.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Decodes from the latest rebuild still outstanding.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Number of tinted images ready.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The tinted image for `colour`, if decoded.
    pub fn get(&self, colour: Colour) -> Option<&RgbaImage> {
        self.images.get(&colour)
    }

    fn accept(&mut self, decoded: Decoded) -> bool {
        if decoded.generation != self.generation {
            debug!(colour = %decoded.colour, "dropping stale brush decode");
            return false;
        }
        self.pending = self.pending.saturating_sub(1);
        match decoded.result {
            Ok(image) => {
                self.images.insert(decoded.colour, image);
                true
            }
            Err(e) => {
                warn!(colour = %decoded.colour, error = %e, "brush image failed to decode");
                false
            }
        }
    }
}

impl Default for ImageBrushCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TintedImages for ImageBrushCache {
    fn tinted(&self, colour: Colour) -> Option<&RgbaImage> {
        self.get(colour)
    }
}

impl std::fmt::Debug for ImageBrushCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBrushCache")
            .field("has_source", &self.source.is_some())
            .field("images", &self.images.len())
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Condvar, Mutex};

    use image::Rgba;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::GlowError;

    const RED: Colour = Colour::rgb(255, 0, 0);
    const BLUE: Colour = Colour::rgb(0, 0, 255);

    /// Decodes `fill="#rrggbb"` into a 1x1 image of that colour.
    struct FillDecoder;

    impl Decoder for FillDecoder {
        fn decode(&self, svg: &str) -> Result<RgbaImage> {
            let start = svg.find("fill=\"").ok_or_else(|| GlowError::Decode {
                message: "no fill".to_string(),
            })? + 6;
            let colour = Colour::from_hex(&svg[start..start + 7])?;
            Ok(RgbaImage::from_pixel(1, 1, Rgba(colour.to_rgba())))
        }
    }

    /// Holds every decode until released.
    struct GatedDecoder {
        open: Mutex<bool>,
        signal: Condvar,
    }

    impl GatedDecoder {
        fn new() -> Self {
            Self {
                open: Mutex::new(false),
                signal: Condvar::new(),
            }
        }

        fn release(&self) {
            *self.open.lock().unwrap() = true;
            self.signal.notify_all();
        }
    }

    impl Decoder for GatedDecoder {
        fn decode(&self, svg: &str) -> Result<RgbaImage> {
            let mut open = self.open.lock().unwrap();
            while !*open {
                open = self.signal.wait(open).unwrap();
            }
            FillDecoder.decode(svg)
        }
    }

    const SVG: &str = r#"<svg><rect fill="black"/></svg>"#;

    #[test]
    fn test_load_decodes_every_palette_colour() {
        let mut cache = ImageBrushCache::with_decoder(Arc::new(FillDecoder));
        cache.load(SVG, &[RED, BLUE]);
        assert_eq!(cache.pending(), 2);

        assert_eq!(cache.wait_pending(), 2);
        assert_eq!(cache.get(RED).unwrap().get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(cache.get(BLUE).unwrap().get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_lookup_misses_until_polled() {
        let decoder = Arc::new(GatedDecoder::new());
        let mut cache = ImageBrushCache::with_decoder(decoder.clone());
        cache.load(SVG, &[RED]);

        assert_eq!(cache.poll(), 0);
        assert!(cache.tinted(RED).is_none());

        decoder.release();
        cache.wait_pending();
        assert!(cache.tinted(RED).is_some());
    }

    #[test]
    fn test_rebuild_discards_stale_decodes() {
        let decoder = Arc::new(GatedDecoder::new());
        let mut cache = ImageBrushCache::with_decoder(decoder.clone());
        cache.load(SVG, &[RED, BLUE]);
        cache.rebuild(&[BLUE]);
        assert_eq!(cache.pending(), 1);

        decoder.release();
        assert_eq!(cache.wait_pending(), 1);
        // Let the first round's stragglers arrive too; they must be dropped.
        thread::sleep(Duration::from_millis(50));
        cache.poll();

        assert!(cache.get(RED).is_none());
        assert!(cache.get(BLUE).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_rebuild_without_source_is_empty() {
        let mut cache = ImageBrushCache::with_decoder(Arc::new(FillDecoder));
        cache.rebuild(&[RED]);
        assert_eq!(cache.pending(), 0);
        assert!(cache.is_empty());
        assert!(!cache.has_source());
    }

    #[test]
    fn test_empty_upload_is_ignored() {
        let mut cache = ImageBrushCache::with_decoder(Arc::new(FillDecoder));
        cache.load(SVG, &[RED]);
        cache.wait_pending();

        cache.load("   ", &[RED]);
        assert!(cache.has_source());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_decode_leaves_entry_absent() {
        let mut cache = ImageBrushCache::with_decoder(Arc::new(FillDecoder));
        cache.load("<svg/>", &[RED]);
        assert_eq!(cache.wait_pending(), 0);
        assert!(cache.get(RED).is_none());
        assert_eq!(cache.pending(), 0);
    }
}
