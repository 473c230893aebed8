//! Color conversions used by the randomizer and the painter adapter.

/// Converts an HSL triple to a `#rrggbb` hex string.
///
/// Hue is in degrees (0–360), saturation and lightness in percent (0–100).
/// Each channel is computed with the chroma formula
/// `f(n) = l - a * max(min(k - 3, 9 - k, 1), -1)` where
/// `k = (n + h / 30) mod 12` and `a = s * min(l, 1 - l)`.
pub fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let l = lightness / 100.0;
    let a = saturation * l.min(1.0 - l) / 100.0;
    let channel = |n: f64| -> u8 {
        let k = (n + hue / 30.0) % 12.0;
        let value = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        // Rounds half up, matching Math.round for the non-negative range here.
        (255.0 * value + 0.5).floor().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0.0), channel(8.0), channel(4.0))
}

/// Parses a `#rrggbb` (or `rrggbb`) string into its channels.
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let mut rgb = [0u8; 3];
    for (i, slot) in rgb.iter_mut().enumerate() {
        *slot = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn primary_vectors() {
        assert_eq!(hsl_to_hex(0.0, 100.0, 50.0), "#ff0000");
        assert_eq!(hsl_to_hex(120.0, 100.0, 50.0), "#00ff00");
        assert_eq!(hsl_to_hex(240.0, 100.0, 50.0), "#0000ff");
        assert_eq!(hsl_to_hex(360.0, 100.0, 50.0), "#ff0000");
    }

    #[test]
    fn greys_and_extremes() {
        assert_eq!(hsl_to_hex(0.0, 0.0, 0.0), "#000000");
        assert_eq!(hsl_to_hex(0.0, 0.0, 100.0), "#ffffff");
        assert_eq!(hsl_to_hex(200.0, 0.0, 50.0), "#808080");
    }

    #[test]
    fn mixed_vectors() {
        // Gold-ish default foreground lives around h=51.
        assert_eq!(hsl_to_hex(51.0, 100.0, 50.0), "#ffd900");
        assert_eq!(hsl_to_hex(30.0, 50.0, 25.0), "#604020");
    }

    #[test]
    fn parse_hex_accepts_with_and_without_hash() {
        assert_eq!(parse_hex("#ffd700"), Some([255, 215, 0]));
        assert_eq!(parse_hex("0a0a0a"), Some([10, 10, 10]));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }

    /// Straightforward HSL→RGB used to cross-check the chroma formula.
    fn reference_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
        let s = s / 100.0;
        let l = l / 100.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = (h % 360.0) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f64| ((v + m) * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8;
        [to_u8(r), to_u8(g), to_u8(b)]
    }

    proptest! {
        #[test]
        fn output_is_normalized_hex(h in 0u32..=360, s in 0u32..=100, l in 0u32..=100) {
            let hex = hsl_to_hex(h as f64, s as f64, l as f64);
            prop_assert_eq!(hex.len(), 7);
            prop_assert!(hex.starts_with('#'));
            prop_assert!(hex[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
            prop_assert!(parse_hex(&hex).is_some());
        }

        #[test]
        fn agrees_with_sector_formula(h in 0u32..360, s in 0u32..=100, l in 0u32..=100) {
            let rgb = parse_hex(&hsl_to_hex(h as f64, s as f64, l as f64)).unwrap();
            let expected = reference_rgb(h as f64, s as f64, l as f64);
            for (got, want) in rgb.iter().zip(expected.iter()) {
                // The two formulations differ only in floating point rounding.
                prop_assert!((*got as i16 - *want as i16).abs() <= 1);
            }
        }
    }
}
