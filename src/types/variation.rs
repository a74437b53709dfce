//! Random colour variation.

use super::random::RandomSource;
use super::Colour;

/// Perturb each RGB channel of `base` by an independent uniform offset in
/// `[-amount, amount]`, clamped to `[0, 255]` and rounded.
///
/// The result is always opaque. Negative amounts behave like zero.
pub fn vary_colour(base: Colour, amount: f32, rng: &mut (impl RandomSource + ?Sized)) -> Colour {
    let amount = amount.max(0.0);
    let mut vary = |channel: u8| -> u8 {
        let offset = (rng.next_unit() - 0.5) * amount * 2.0;
        (channel as f32 + offset).clamp(0.0, 255.0).round() as u8
    };
    let r = vary(base.r);
    let g = vary(base.g);
    let b = vary(base.b);
    Colour::rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::XorShift32;

    /// Replays a fixed sequence of unit values.
    struct Sequence(Vec<f32>, usize);

    impl RandomSource for Sequence {
        fn next_unit(&mut self) -> f32 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v
        }
    }

    #[test]
    fn test_zero_variation_is_identity() {
        let mut rng = XorShift32::from_seed(3);
        let base = Colour::rgb(12, 200, 99);
        for _ in 0..100 {
            assert_eq!(vary_colour(base, 0.0, &mut rng), base);
        }
    }

    #[test]
    fn test_channels_stay_within_bounds() {
        let mut rng = XorShift32::from_seed(11);
        for base in [Colour::BLACK, Colour::WHITE, Colour::rgb(128, 3, 252)] {
            for _ in 0..500 {
                let c = vary_colour(base, 60.0, &mut rng);
                for (out, orig) in c.channels().iter().zip(base.channels()) {
                    assert!((*out as i32 - orig as i32).abs() <= 60);
                }
            }
        }
    }

    #[test]
    fn test_extreme_offsets_clamp() {
        // 0.0 maps to -amount, values near 1.0 to +amount.
        let mut low = Sequence(vec![0.0], 0);
        assert_eq!(vary_colour(Colour::rgb(10, 10, 10), 30.0, &mut low), Colour::BLACK);

        let mut high = Sequence(vec![0.999_999], 0);
        assert_eq!(vary_colour(Colour::rgb(250, 250, 250), 30.0, &mut high), Colour::WHITE);
    }

    #[test]
    fn test_channels_vary_independently() {
        let mut seq = Sequence(vec![0.0, 0.5, 0.75], 0);
        let c = vary_colour(Colour::rgb(100, 100, 100), 20.0, &mut seq);
        assert_eq!(c, Colour::rgb(80, 100, 110));
    }

    #[test]
    fn test_result_is_opaque() {
        let mut rng = XorShift32::from_seed(5);
        let c = vary_colour(Colour::new(1, 2, 3, 0), 10.0, &mut rng);
        assert!(c.is_opaque());
    }
}
