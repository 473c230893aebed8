//! Random number helpers shared by the generator, randomizer and layout engine.

use crate::color::hsl_to_hex;
use crate::constants::{DARK_LIGHTNESS, LIGHT_LIGHTNESS};
use rand::distr::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lightness band a random color is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lightness {
    /// Low lightness, used for backgrounds
    Dark,
    /// High lightness, used for glyph colors
    Light,
}

/// Random source for everything the pattern engine samples.
///
/// All integer ranges are inclusive on both ends.
pub struct PatternRng {
    rng: StdRng,
}

impl Default for PatternRng {
    fn default() -> Self {
        Self::from_os()
    }
}

impl PatternRng {
    /// Creates a generator seeded from the operating system.
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a deterministic generator, mainly for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns a uniformly sampled value in `min..=max`.
    ///
    /// Reversed bounds are swapped rather than rejected.
    pub fn random_int<T>(&mut self, min: T, max: T) -> T
    where
        T: SampleUniform + PartialOrd + Copy,
    {
        if min > max {
            self.rng.random_range(max..=min)
        } else {
            self.rng.random_range(min..=max)
        }
    }

    /// Picks a uniformly chosen element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.random_int(0, items.len() - 1);
        items.get(index)
    }

    /// Returns a random `#rrggbb` color whose lightness falls in the given band.
    ///
    /// Hue and saturation are always sampled over their full range.
    pub fn random_color(&mut self, mode: Lightness) -> String {
        let (low, high) = match mode {
            Lightness::Dark => DARK_LIGHTNESS,
            Lightness::Light => LIGHT_LIGHTNESS,
        };
        let lightness = self.random_int(low, high);
        let hue = self.random_int(0u32, 360);
        let saturation = self.random_int(0u32, 100);
        hsl_to_hex(hue as f64, saturation as f64, lightness as f64)
    }

    /// Returns `true` with probability one half.
    pub fn coin(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}
