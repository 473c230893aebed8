//! Layout and render planning.
//!
//! [`render`] maps a [`PatternConfig`] and the metrics of a target surface to a
//! [`RenderPlan`]: how many times the motif repeats to fill the surface, and
//! either one inert block of text or a sequence of individually styled glyph
//! cells. The plan is plain data; applying it to a display is the job of an
//! adapter (see `ui::rendering`).

use crate::constants::{
    MAX_RENDERED_GLYPHS, RECOLOR_INTERVALS_MS, SATISFY_OPACITY, SATISFY_VOLUME, SPICY_SKEW, SPICY_TIER_ANGLES,
    SPICY_TURN_CHOICES,
};
use crate::error::{Error, Result};
use crate::random::{Lightness, PatternRng};
use crate::types::{FontFamily, PatternConfig};

/// Pixel size and text measurement capability of a render target.
pub trait SurfaceMetrics {
    /// Surface width in pixels.
    fn pixel_width(&self) -> f32;
    /// Surface height in pixels.
    fn pixel_height(&self) -> f32;
    /// Rendered width of a single glyph.
    fn measure_glyph_width(&self, glyph: char, font_size: u32, font_family: FontFamily) -> f32;
}

/// Styling applied once to the whole container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerStyle {
    /// Container rotation in degrees
    pub rotation_deg: i32,
    /// Render scale
    pub scale: f64,
    /// Glyph size in pixels
    pub font_size: u32,
    /// Typeface
    pub font_family: FontFamily,
    /// Glyph color
    pub color: String,
    /// Background color
    pub background_color: String,
    /// Extra spacing after each glyph, in pixels
    pub letter_spacing_px: f32,
    /// Line height as a multiple of the font size
    pub line_height_factor: f32,
    /// Whether the container is in satisfy mode
    pub satisfy: bool,
}

impl ContainerStyle {
    fn from_config(config: &PatternConfig) -> Self {
        Self {
            rotation_deg: config.rotation,
            scale: config.scale(),
            font_size: config.font_size,
            font_family: config.font_family,
            color: config.color.clone(),
            background_color: config.background_color.clone(),
            letter_spacing_px: config.letter_spacing_px(),
            line_height_factor: config.line_height_factor(),
            satisfy: config.satisfy,
        }
    }
}

/// Spin direction of a glyph in satisfy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinDirection {
    /// Counter-clockwise
    Left,
    /// Clockwise
    Right,
}

impl SpinDirection {
    /// Sign of the angular velocity.
    pub fn sign(self) -> f64 {
        match self {
            SpinDirection::Left => -1.0,
            SpinDirection::Right => 1.0,
        }
    }
}

/// Periodic recoloring attached to a glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorize {
    /// Initial color
    pub color: String,
    /// Recolor interval, also used as the color transition duration
    pub interval_ms: u32,
}

/// Nested transform applied to a spicy glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spice {
    /// Rotation tier (0–3) derived from the glyph index
    pub tier: usize,
    /// Rotation around the view axis
    pub rotation_deg: i32,
    /// Turn around the vertical axis
    pub turn_deg: i32,
    /// Skew applied on both axes
    pub skew_deg: i32,
}

/// One styled glyph of a decorated render.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphCell {
    /// The glyph itself
    pub glyph: char,
    /// Explicit cell width; set for blank glyphs
    pub width: Option<f32>,
    /// Spin direction in satisfy mode
    pub spin: Option<SpinDirection>,
    /// Reduced opacity in satisfy mode
    pub opacity: Option<f32>,
    /// Recoloring in colorize mode
    pub colorize: Option<Colorize>,
    /// Nested transform in spicy mode; `None` renders the glyph unwrapped
    pub spice: Option<Spice>,
}

/// A piece of an inert text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment<'a> {
    /// A run of visible glyphs
    Text(&'a str),
    /// A fixed-width blank cell standing in for a space
    Blank(f32),
}

/// Undecorated output: the repeated motif as a single block of text.
#[derive(Debug, Clone, PartialEq)]
pub struct InertText {
    /// The repeated motif
    pub text: String,
    /// Width each space expands to
    pub blank_width: f32,
}

impl InertText {
    /// Splits the text into glyph runs and blank cells.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments = Vec::new();
        for (i, run) in self.text.split(' ').enumerate() {
            if i > 0 {
                segments.push(Segment::Blank(self.blank_width));
            }
            if !run.is_empty() {
                segments.push(Segment::Text(run));
            }
        }
        segments
    }
}

/// The content of a render plan.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderBody {
    /// Nothing to draw (empty motif)
    Empty,
    /// Fast path: no per-glyph styling
    Inert(InertText),
    /// Per-glyph styled cells
    Decorated(Vec<GlyphCell>),
}

/// Audio side effect requested by a render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioRequest {
    /// Start (or keep) playing at the given volume
    Play {
        /// Playback volume in 0..=1
        volume: f32,
    },
    /// Stop any playback
    Pause,
}

/// Tiling numbers derived from the surface and the config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tiling {
    /// Height of one line in pixels
    pub line_height_px: f32,
    /// Average width of one glyph including spacing, in pixels
    pub char_width_px: f32,
    /// Lines needed to cover the surface
    pub line_count: usize,
    /// Glyphs needed to cover one line
    pub chars_per_line: usize,
    /// Glyphs needed to cover the surface
    pub total_chars: usize,
    /// Times the motif is repeated
    pub repeat_count: usize,
}

/// Everything needed to draw one surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    /// Container-level styling
    pub container: ContainerStyle,
    /// Tiling numbers; `None` when the motif is empty
    pub tiling: Option<Tiling>,
    /// What to draw
    pub body: RenderBody,
    /// Audio side effect
    pub audio: AudioRequest,
}

impl RenderPlan {
    /// Number of glyph cells with a recolor interval.
    pub fn recolor_count(&self) -> usize {
        match &self.body {
            RenderBody::Decorated(cells) => cells.iter().filter(|c| c.colorize.is_some()).count(),
            _ => 0,
        }
    }
}

/// Side length of a square surface whose rotation always covers the viewport.
pub fn container_side(viewport_width: f32, viewport_height: f32) -> f32 {
    viewport_width.hypot(viewport_height).ceil()
}

/// Rotation tier of the glyph at `index`: multiples of 4 get the top tier,
/// then multiples of 3, then multiples of 2, everything else the base tier.
pub fn spicy_tier(index: usize) -> usize {
    if index % 4 == 0 {
        3
    } else if index % 3 == 0 {
        2
    } else if index % 2 == 0 {
        1
    } else {
        0
    }
}

/// Computes how many repetitions of the motif fill the surface.
///
/// The repeat count never yields more than [`MAX_RENDERED_GLYPHS`] glyphs.
pub fn tiling(config: &PatternConfig, surface: &impl SurfaceMetrics) -> Result<Tiling> {
    let pattern_len = config.pattern_len();
    if pattern_len == 0 {
        return Err(Error::EmptyPattern);
    }

    let line_height_px = (config.line_height_factor() * config.font_size as f32).max(1.0);

    let width_sum: f32 = config
        .line_pattern
        .chars()
        .map(|glyph| surface.measure_glyph_width(glyph, config.font_size, config.font_family))
        .sum();
    let char_width_px = (width_sum / pattern_len as f32 + config.letter_spacing_px())
        .ceil()
        .max(1.0);

    let line_count = (surface.pixel_height().max(0.0) / line_height_px).ceil() as usize;
    let chars_per_line = (surface.pixel_width().max(0.0) / char_width_px).ceil() as usize;
    let total_chars = line_count.saturating_mul(chars_per_line);
    let requested = match config.repeat_amount {
        Some(amount) => amount as usize,
        None => total_chars.div_ceil(pattern_len),
    };
    let repeat_count = requested.min((MAX_RENDERED_GLYPHS / pattern_len).max(1));

    Ok(Tiling {
        line_height_px,
        char_width_px,
        line_count,
        chars_per_line,
        total_chars,
        repeat_count,
    })
}

/// Builds the render plan for `config` on `surface`.
///
/// The result is deterministic apart from the deliberately random per-glyph
/// choices (spin direction, colorize color and interval, spicy turn and skew).
pub fn render(
    config: &PatternConfig,
    surface: &impl SurfaceMetrics,
    rng: &mut PatternRng,
) -> RenderPlan {
    let container = ContainerStyle::from_config(config);
    let audio = if config.satisfy {
        AudioRequest::Play {
            volume: SATISFY_VOLUME,
        }
    } else {
        AudioRequest::Pause
    };

    let tiling = match tiling(config, surface) {
        Ok(tiling) => tiling,
        Err(err) => {
            log::warn!("Skipping render: {err}");
            return RenderPlan {
                container,
                tiling: None,
                body: RenderBody::Empty,
                audio,
            };
        }
    };

    let repeated = config.line_pattern.repeat(tiling.repeat_count);
    let body = if config.is_decorated() {
        RenderBody::Decorated(
            repeated
                .chars()
                .enumerate()
                .map(|(index, glyph)| decorate(config, index, glyph, rng))
                .collect(),
        )
    } else {
        RenderBody::Inert(InertText {
            text: repeated,
            blank_width: config.font_size as f32 + config.letter_spacing_px(),
        })
    };

    RenderPlan {
        container,
        tiling: Some(tiling),
        body,
        audio,
    }
}

fn decorate(config: &PatternConfig, index: usize, glyph: char, rng: &mut PatternRng) -> GlyphCell {
    let mut cell = GlyphCell {
        glyph,
        width: (glyph == ' ').then_some(config.font_size as f32),
        spin: None,
        opacity: None,
        colorize: None,
        spice: None,
    };

    if config.satisfy {
        cell.spin = Some(if rng.coin() {
            SpinDirection::Right
        } else {
            SpinDirection::Left
        });
        cell.opacity = Some(SATISFY_OPACITY);
    }

    if config.colorize {
        let interval_ms = rng
            .pick(&RECOLOR_INTERVALS_MS)
            .copied()
            .unwrap_or(RECOLOR_INTERVALS_MS[0]);
        cell.colorize = Some(Colorize {
            color: rng.random_color(Lightness::Light),
            interval_ms,
        });
    }

    if config.spicy {
        let tier = spicy_tier(index);
        let skew_deg = if rng.coin() { SPICY_SKEW } else { -SPICY_SKEW };
        cell.spice = Some(Spice {
            tier,
            rotation_deg: SPICY_TIER_ANGLES[tier],
            turn_deg: rng.pick(&SPICY_TURN_CHOICES).copied().unwrap_or(0),
            skew_deg,
        });
    }

    cell
}
