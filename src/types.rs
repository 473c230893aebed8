//! Core data types for the pattern machine.
//!
//! This module defines the pattern configuration record, the enumerated font
//! list and the character packs patterns are generated from.

use crate::constants::{
    MAX_FONT_SIZE, MAX_LETTER_SPACING, MAX_LINE_HEIGHT, MAX_PATTERN_CHARS, MAX_REPEAT,
    PREVIEW_REPEAT, PREVIEW_SCALE, SCALE_RANGE,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Typefaces a pattern can be drawn with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Major Mono Display
    #[serde(rename = "Major Mono Display")]
    MajorMonoDisplay,
    /// Shadows Into Light
    #[serde(rename = "Shadows Into Light")]
    ShadowsIntoLight,
    /// Syne Mono
    #[serde(rename = "Syne Mono")]
    SyneMono,
    /// VT323
    #[serde(rename = "VT323")]
    Vt323,
}

impl FontFamily {
    /// Every font the randomizer can choose from, in declaration order.
    pub const ALL: [FontFamily; 4] = [
        FontFamily::MajorMonoDisplay,
        FontFamily::ShadowsIntoLight,
        FontFamily::SyneMono,
        FontFamily::Vt323,
    ];

    /// Human-facing typeface name.
    pub fn name(self) -> &'static str {
        match self {
            FontFamily::MajorMonoDisplay => "Major Mono Display",
            FontFamily::ShadowsIntoLight => "Shadows Into Light",
            FontFamily::SyneMono => "Syne Mono",
            FontFamily::Vt323 => "VT323",
        }
    }

    /// Whether the typeface is fixed-width.
    pub fn is_monospace(self) -> bool {
        !matches!(self, FontFamily::ShadowsIntoLight)
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named, fixed set of glyphs patterns are sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterPack {
    /// Key used by [`PatternConfig::active_pack`]
    pub name: &'static str,
    /// Candidate glyphs
    pub glyphs: &'static str,
}

/// All character packs, in declaration order. The first one is the default.
pub const PACKS: &[CharacterPack] = &[
    CharacterPack {
        name: "Favs",
        glyphs: "░█▄•!=,¦•(ö≈┬",
    },
    CharacterPack {
        name: "Ellegant",
        glyphs: "░░█▄▌•",
    },
    CharacterPack {
        name: "Slim",
        glyphs: "_!\"#*+,-/¦<=>†‡‹“”–—˜›^´``",
    },
    CharacterPack {
        name: "Curvy",
        glyphs: "&().?ƒ„ˆ‹“”•›œ?ö~^º ",
    },
    CharacterPack {
        name: "Wise",
        glyphs: "αßΓπΣσµτΦΘΩδ∞φε∩≡±≥≤⌠⌡÷≈°∙",
    },
    CharacterPack {
        name: "Arkitekt",
        glyphs: "╛┐└┴┬├─┼╞╟╚╔╩╦╠═╬╧╨╤╥╙╘╒╓╫╪┘┌",
    },
];

impl CharacterPack {
    /// Looks a pack up by name, falling back to the first declared pack.
    pub fn resolve(name: Option<&str>) -> &'static CharacterPack {
        name.and_then(|name| PACKS.iter().find(|pack| pack.name == name))
            .unwrap_or(&PACKS[0])
    }
}

/// The configuration record every rendered pattern is derived from.
///
/// Field names serialize in camelCase so shared links stay readable by other
/// clients of the same format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternConfig {
    /// The repeating glyph motif
    pub line_pattern: String,
    /// Glyph size in pixels
    #[serde(deserialize_with = "lenient::number")]
    pub font_size: u32,
    /// Glyph color as `#rrggbb`
    pub color: String,
    /// Background color as `#rrggbb`
    pub background_color: String,
    /// Container rotation in degrees
    #[serde(deserialize_with = "lenient::number")]
    pub rotation: i32,
    /// Line height multiplier ×10
    #[serde(deserialize_with = "lenient::number")]
    pub line_height: u32,
    /// Letter spacing in pixels ×10
    #[serde(deserialize_with = "lenient::number")]
    pub letter_spacing: i32,
    /// Typeface
    pub font_family: FontFamily,
    /// Character pack used when generating new motifs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_pack: Option<String>,
    /// Per-glyph rotation and skew
    #[serde(default)]
    pub spicy: bool,
    /// Spinning glyphs with accompanying audio
    #[serde(default)]
    pub satisfy: bool,
    /// Per-glyph periodic recoloring
    #[serde(default)]
    pub colorize: bool,
    /// Explicit repeat count, bypassing the surface-fill computation
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub repeat_amount: Option<u32>,
    /// Explicit render scale
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub container_scale: Option<f64>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            line_pattern: "_._.—.—.".to_string(),
            font_size: 30,
            color: "#ffd700".to_string(),
            background_color: "#0a0a0a".to_string(),
            rotation: 45,
            line_height: 10,
            letter_spacing: 4,
            font_family: FontFamily::ShadowsIntoLight,
            active_pack: Some(PACKS[0].name.to_string()),
            spicy: true,
            satisfy: false,
            colorize: false,
            repeat_amount: None,
            container_scale: None,
        }
    }
}

impl PatternConfig {
    /// Number of fields compared when looking for near-duplicates.
    pub const COMPARED_FIELDS: usize = 12;

    /// Serialize the config to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamps every size-like field into a range the renderer can handle.
    ///
    /// Configs decoded from links or storage pass through here, so a crafted
    /// value can never request an unbounded allocation.
    pub fn sanitized(mut self) -> Self {
        if self.line_pattern.chars().count() > MAX_PATTERN_CHARS {
            self.line_pattern = self.line_pattern.chars().take(MAX_PATTERN_CHARS).collect();
        }
        self.font_size = self.font_size.clamp(1, MAX_FONT_SIZE);
        self.line_height = self.line_height.min(MAX_LINE_HEIGHT);
        self.letter_spacing = self
            .letter_spacing
            .clamp(-MAX_LETTER_SPACING, MAX_LETTER_SPACING);
        self.repeat_amount = self.repeat_amount.map(|amount| amount.min(MAX_REPEAT));
        self.container_scale = self
            .container_scale
            .filter(|scale| scale.is_finite())
            .map(|scale| scale.clamp(SCALE_RANGE.0, SCALE_RANGE.1));
        self
    }

    /// The pack new motifs are drawn from.
    pub fn pack(&self) -> &'static CharacterPack {
        CharacterPack::resolve(self.active_pack.as_deref())
    }

    /// Number of glyphs in the motif.
    pub fn pattern_len(&self) -> usize {
        self.line_pattern.chars().count()
    }

    /// Line height as a multiple of the font size.
    pub fn line_height_factor(&self) -> f32 {
        self.line_height as f32 / 10.0
    }

    /// Letter spacing in pixels.
    pub fn letter_spacing_px(&self) -> f32 {
        self.letter_spacing as f32 / 10.0
    }

    /// Render scale, defaulting to 1.
    pub fn scale(&self) -> f64 {
        self.container_scale.unwrap_or(1.0)
    }

    /// Whether any per-glyph decoration is enabled.
    pub fn is_decorated(&self) -> bool {
        self.spicy || self.satisfy || self.colorize
    }

    /// Snapshot suitable for the history log: `satisfy` is always cleared so
    /// replaying history never restarts audio or spinning.
    pub fn history_snapshot(&self) -> Self {
        Self {
            satisfy: false,
            ..self.clone()
        }
    }

    /// Compact variant used to draw history thumbnails.
    pub fn preview(&self) -> Self {
        Self {
            container_scale: Some(PREVIEW_SCALE),
            repeat_amount: Some(PREVIEW_REPEAT),
            line_height: 10,
            letter_spacing: 10,
            font_size: 30,
            satisfy: false,
            ..self.clone()
        }
    }

    /// Counts the core fields that are identical between two configs.
    ///
    /// The optional preview overrides are not part of the comparison.
    pub fn matching_fields(&self, other: &Self) -> usize {
        [
            self.line_pattern == other.line_pattern,
            self.font_size == other.font_size,
            self.color == other.color,
            self.background_color == other.background_color,
            self.rotation == other.rotation,
            self.line_height == other.line_height,
            self.letter_spacing == other.letter_spacing,
            self.font_family == other.font_family,
            self.active_pack == other.active_pack,
            self.spicy == other.spicy,
            self.satisfy == other.satisfy,
            self.colorize == other.colorize,
        ]
        .iter()
        .filter(|same| **same)
        .count()
    }
}

/// Deserializers that accept numbers encoded either as JSON numbers or as
/// numeric strings, since form inputs historically stored raw string values.
mod lenient {
    use super::*;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString<T> {
        Number(T),
        String(String),
    }

    pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
    {
        match NumberOrString::<T>::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid number: {s:?}"))),
        }
    }

    pub fn optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
    {
        match Option::<NumberOrString<T>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrString::Number(n)) => Ok(Some(n)),
            Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(None),
            Some(NumberOrString::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid number: {s:?}"))),
        }
    }
}
