//! Device-aware randomization of pattern configs.

use crate::constants::{MOBILE_BREAKPOINT, ROTATION_CHOICES};
use crate::pattern::generate_pattern;
use crate::random::{Lightness, PatternRng};
use crate::types::{FontFamily, PatternConfig};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Broad device category, chosen from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    /// Viewport at or below the breakpoint
    Mobile,
    /// Anything wider
    Desktop,
}

impl DeviceClass {
    /// Classifies a viewport by its width in logical pixels.
    pub fn from_viewport_width(width: f32) -> Self {
        if width <= MOBILE_BREAKPOINT {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Bounds the randomizer and the controls use for this device class.
    pub fn ranges(self) -> DeviceRanges {
        match self {
            DeviceClass::Mobile => DeviceRanges::MOBILE,
            DeviceClass::Desktop => DeviceRanges::DESKTOP,
        }
    }
}

/// Inclusive bounds for the size-related config fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRanges {
    /// Font size bounds, in pixels
    pub font_size: (u32, u32),
    /// Line height bounds, ×10
    pub line_height: (u32, u32),
    /// Letter spacing bounds, ×10
    pub letter_spacing: (i32, i32),
}

impl DeviceRanges {
    /// Bounds for small screens.
    pub const MOBILE: DeviceRanges = DeviceRanges {
        font_size: (40, 100),
        line_height: (11, 14),
        letter_spacing: (50, 100),
    };

    /// Bounds for large screens.
    pub const DESKTOP: DeviceRanges = DeviceRanges {
        font_size: (60, 150),
        line_height: (15, 25),
        letter_spacing: (70, 140),
    };

    /// Font size bounds as a range.
    pub fn font_size_range(&self) -> RangeInclusive<u32> {
        self.font_size.0..=self.font_size.1
    }

    /// Line height bounds as a range.
    pub fn line_height_range(&self) -> RangeInclusive<u32> {
        self.line_height.0..=self.line_height.1
    }

    /// Letter spacing bounds as a range.
    pub fn letter_spacing_range(&self) -> RangeInclusive<i32> {
        self.letter_spacing.0..=self.letter_spacing.1
    }

    /// Whether every size field of `config` lies within these bounds.
    pub fn contains(&self, config: &PatternConfig) -> bool {
        self.font_size_range().contains(&config.font_size)
            && self.line_height_range().contains(&config.line_height)
            && self.letter_spacing_range().contains(&config.letter_spacing)
    }
}

impl Default for DeviceRanges {
    fn default() -> Self {
        Self::DESKTOP
    }
}

/// Knobs for [`randomize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomizeOptions {
    /// Keep the current font instead of picking a new one
    pub skip_font_rand: bool,
}

/// Produces a new config by sampling every tunable field.
///
/// Colors, sizes, the motif, rotation and (unless `skip_font_rand`) the font
/// are resampled; the active pack, render-mode flags and preview overrides are
/// carried over unchanged.
pub fn randomize(
    current: &PatternConfig,
    ranges: &DeviceRanges,
    options: RandomizeOptions,
    rng: &mut PatternRng,
) -> PatternConfig {
    let background_color = rng.random_color(Lightness::Dark);
    let color = rng.random_color(Lightness::Light);
    let font_size = rng.random_int(ranges.font_size.0, ranges.font_size.1);
    let line_pattern = match generate_pattern(current.pack(), rng) {
        Ok(pattern) => pattern,
        Err(err) => {
            log::warn!("Keeping current pattern: {err}");
            current.line_pattern.clone()
        }
    };
    let line_height = rng.random_int(ranges.line_height.0, ranges.line_height.1);
    let letter_spacing = rng.random_int(ranges.letter_spacing.0, ranges.letter_spacing.1);
    let rotation = rng
        .pick(&ROTATION_CHOICES)
        .copied()
        .unwrap_or(current.rotation);
    let font_family = if options.skip_font_rand {
        current.font_family
    } else {
        rng.pick(&FontFamily::ALL)
            .copied()
            .unwrap_or(current.font_family)
    };

    PatternConfig {
        line_pattern,
        font_size,
        color,
        background_color,
        rotation,
        line_height,
        letter_spacing,
        font_family,
        ..current.clone()
    }
}
