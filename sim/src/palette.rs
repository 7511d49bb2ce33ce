//! Turret colour table.
//!
//! Hues are spread with the golden ratio so neighbouring ids get distinct
//! colours; saturation and value cycle through small steps. The starting hue
//! is drawn from a seeded RNG so the whole table is a pure function of
//! `(count, seed)`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;

/// An RGB colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert hue (degrees), saturation and value to RGB.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = value * saturation;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = value - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self::new(r + m, g + m, b + m)
    }
}

/// Generate `count` colours deterministically from `seed`.
pub fn generate(count: usize, seed: u64) -> Vec<Rgb> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let hue_offset: f32 = rng.gen_range(0.0..360.0);

    (0..count)
        .map(|i| {
            let hue = (hue_offset + i as f32 * GOLDEN_RATIO_CONJUGATE * 360.0) % 360.0;
            let saturation = 0.5 + (i % 5) as f32 * 0.1;
            let value = 0.6 + (i % 4) as f32 * 0.1;
            Rgb::from_hsv(hue, saturation, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_for_seed() {
        assert_eq!(generate(100, 42), generate(100, 42));
        assert_ne!(generate(8, 1), generate(8, 2));
    }

    #[test]
    fn test_channels_in_range() {
        for colour in generate(100, 7) {
            for channel in [colour.r, colour.g, colour.b] {
                assert!((0.0..=1.0).contains(&channel), "{colour:?}");
            }
        }
    }

    #[test]
    fn test_hsv_primaries() {
        let red = Rgb::from_hsv(0.0, 1.0, 1.0);
        assert_eq!(red, Rgb::new(1.0, 0.0, 0.0));
        let green = Rgb::from_hsv(120.0, 1.0, 1.0);
        assert!((green.g - 1.0).abs() < 1e-6 && green.r.abs() < 1e-6);
        let grey = Rgb::from_hsv(200.0, 0.0, 0.5);
        assert_eq!(grey, Rgb::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_neighbouring_hues_differ() {
        let colours = generate(2, 0);
        assert_ne!(colours[0], colours[1]);
    }
}
