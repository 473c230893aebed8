//! Shared application-wide constants.
//! Centralizes tweakable values used across layout, randomization and the app shell.

// History
/// Maximum number of history entries to retain.
pub const MAX_HISTORY: usize = 100;
/// Number of past patterns shown in the history view.
pub const HISTORY_VIEW_LEN: usize = 19;
/// Storage key under which the history log is persisted.
pub const HISTORY_STORAGE_KEY: &str = "patternMachineHistory";
/// Storage key for persisted UI settings.
pub const APP_STATE_KEY: &str = "app_state";

// Device ranges
/// Viewports at or below this width (in logical pixels) use the mobile ranges.
pub const MOBILE_BREAKPOINT: f32 = 1024.0;

// Pattern generation
/// Shortest generated motif, in glyphs.
pub const PATTERN_MIN_LEN: usize = 2;
/// Longest generated motif, in glyphs.
pub const PATTERN_MAX_LEN: usize = 5;
/// Container rotations the randomizer picks from, in degrees.
pub const ROTATION_CHOICES: [i32; 5] = [20, 45, 65, 135, 155];

// Limits on decoded configs
/// Longest motif accepted from a link or persisted history, in glyphs.
pub const MAX_PATTERN_CHARS: usize = 64;
/// Largest accepted font size, in pixels.
pub const MAX_FONT_SIZE: u32 = 1000;
/// Largest accepted line height (×10 multiplier of the font size).
pub const MAX_LINE_HEIGHT: u32 = 1000;
/// Largest accepted letter spacing magnitude (×10 pixels).
pub const MAX_LETTER_SPACING: i32 = 5000;
/// Largest accepted explicit repeat count.
pub const MAX_REPEAT: u32 = 10_000;
/// Accepted range of explicit render scales.
pub const SCALE_RANGE: (f64, f64) = (0.1, 10.0);
/// Upper bound on glyphs in one render, whatever the surface asks for.
pub const MAX_RENDERED_GLYPHS: usize = 50_000;

// Colors
/// Lightness band (percent) for dark random colors.
pub const DARK_LIGHTNESS: (u32, u32) = (5, 20);
/// Lightness band (percent) for light random colors.
pub const LIGHT_LIGHTNESS: (u32, u32) = (50, 80);

// Decorated rendering
/// Rotation angles for the four spicy tiers.
pub const SPICY_TIER_ANGLES: [i32; 4] = [0, 45, 90, 135];
/// Y-axis turns a spicy glyph may receive, in degrees.
pub const SPICY_TURN_CHOICES: [i32; 3] = [0, 30, -30];
/// Skew magnitude for spicy glyphs, in degrees.
pub const SPICY_SKEW: i32 = 15;
/// Recolor intervals a colorized glyph may use, in milliseconds.
pub const RECOLOR_INTERVALS_MS: [u32; 3] = [500, 700, 1200];
/// Opacity applied to glyphs while `satisfy` is on.
pub const SATISFY_OPACITY: f32 = 0.7;
/// Playback volume requested while `satisfy` is on.
pub const SATISFY_VOLUME: f32 = 0.4;
/// Seconds a satisfy glyph takes for one full turn.
pub const SATISFY_SPIN_PERIOD: f64 = 4.0;

// Timers
/// Delay between the last field edit and the re-render, in milliseconds.
pub const EDIT_DEBOUNCE_MS: u32 = 1000;
/// Cadence of the startup presentation, in milliseconds.
pub const PRESENTATION_INTERVAL_MS: u32 = 200;
/// The presentation stops once it has run more than this many times.
pub const PRESENTATION_ITERATIONS: u32 = 10;
/// Delay before revealing the controls once the presentation ends.
pub const PRESENTATION_REVEAL_MS: u32 = 1000;
/// Delay before revealing the controls after loading a shared pattern.
pub const SHARED_REVEAL_MS: u32 = 200;

// History previews
/// Scale applied to compact history previews.
pub const PREVIEW_SCALE: f64 = 2.5;
/// Fixed repeat count for compact history previews.
pub const PREVIEW_REPEAT: u32 = 30;
/// Side length of a history preview tile, in logical pixels.
pub const PREVIEW_TILE: f32 = 96.0;

// Sharing
/// Base URL used for shareable links when the page location is unknown (native).
pub const DEFAULT_SHARE_BASE: &str = "http://127.0.0.1:8080/";
