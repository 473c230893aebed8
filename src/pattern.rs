//! Random motif generation from a character pack.

use crate::constants::{PATTERN_MAX_LEN, PATTERN_MIN_LEN};
use crate::error::{Error, Result};
use crate::random::PatternRng;
use crate::types::CharacterPack;

/// Builds a short random motif by sampling the pack's glyphs with replacement.
///
/// The motif length is uniform in `PATTERN_MIN_LEN..=PATTERN_MAX_LEN`.
/// Repeated glyphs are allowed.
pub fn generate_pattern(pack: &CharacterPack, rng: &mut PatternRng) -> Result<String> {
    let glyphs: Vec<char> = pack.glyphs.chars().collect();
    if glyphs.is_empty() {
        return Err(Error::EmptyPack(pack.name.to_string()));
    }
    let len = rng.random_int(PATTERN_MIN_LEN, PATTERN_MAX_LEN);
    Ok((0..len)
        .filter_map(|_| rng.pick(&glyphs).copied())
        .collect())
}
