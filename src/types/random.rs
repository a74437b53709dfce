//! Random sources for colour variation and stamp jitter.

use std::time::{SystemTime, UNIX_EPOCH};

/// A source of uniform random numbers.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform value in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

/// Deterministic xorshift32 generator.
///
/// Fast and good enough for visual noise; not for anything else.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Create a generator from a seed. Zero seeds are remapped since
    /// xorshift never leaves the all-zero state.
    pub fn from_seed(seed: u32) -> Self {
        Self { state: seed | 1 }
    }

    /// Seed from the system clock.
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
            .unwrap_or(0x9E37_79B9);
        Self::from_seed(nanos)
    }

    #[inline]
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RandomSource for XorShift32 {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range() {
        let mut rng = XorShift32::from_seed(7);
        for _ in 0..10_000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = XorShift32::from_seed(1234);
        let mut b = XorShift32::from_seed(1234);
        for _ in 0..100 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn test_zero_seed_still_moves() {
        let mut rng = XorShift32::from_seed(0);
        let first = rng.next_unit();
        let second = rng.next_unit();
        assert_ne!(first, second);
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = XorShift32::from_seed(99);
        for _ in 0..1000 {
            let v = rng.range(-1.0, 1.0);
            assert!((-1.0..1.0).contains(&v));
        }
    }
}
