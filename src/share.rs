//! Transport encoding of configs for shareable links.
//!
//! A config travels as JSON, percent-encoded with the `encodeURIComponent`
//! character set, then base64 encoded with the standard alphabet. The result
//! is placed in the fragment of the page URL.

use crate::error::{Error, Result};
use crate::types::PatternConfig;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` escapes: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Standard alphabet decoder that accepts links with or without `=` padding.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes a config into its transport string.
pub fn serialize(config: &PatternConfig) -> String {
    // Serializing plain strings, numbers and booleans cannot fail.
    let json = config.to_json().unwrap_or_default();
    let escaped = utf8_percent_encode(&json, URI_COMPONENT).to_string();
    STANDARD.encode(escaped)
}

/// Decodes a transport string produced by [`serialize`].
///
/// A leading `#` is ignored and missing padding is tolerated. Every failing
/// stage maps to [`Error::MalformedConfig`]. The decoded config is
/// [sanitized](PatternConfig::sanitized).
pub fn deserialize(encoded: &str) -> Result<PatternConfig> {
    let encoded = encoded.trim().trim_start_matches('#');
    if encoded.is_empty() {
        return Err(Error::MalformedConfig("empty config string".to_string()));
    }
    let bytes = FORGIVING
        .decode(encoded)
        .map_err(|e| Error::MalformedConfig(format!("base64: {e}")))?;
    let escaped =
        String::from_utf8(bytes).map_err(|e| Error::MalformedConfig(format!("utf-8: {e}")))?;
    let json = percent_decode_str(&escaped)
        .decode_utf8()
        .map_err(|e| Error::MalformedConfig(format!("percent-encoding: {e}")))?;
    PatternConfig::from_json(&json)
        .map(PatternConfig::sanitized)
        .map_err(|e| Error::MalformedConfig(format!("json: {e}")))
}

/// Builds a shareable URL: `base` with its fragment replaced by the encoded config.
pub fn shareable_url(base: &str, config: &PatternConfig) -> String {
    let base = base.split('#').next().unwrap_or(base);
    format!("{base}#{}", serialize(config))
}

/// Extracts the fragment from a URL or bare `#fragment`, if it is non-empty.
///
/// Input without any `#` is treated as the fragment itself.
pub fn fragment_of(url_or_hash: &str) -> Option<&str> {
    let fragment = match url_or_hash.split_once('#') {
        Some((_, fragment)) => fragment,
        None => url_or_hash,
    };
    let fragment = fragment.trim();
    (!fragment.is_empty()).then_some(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FontFamily;
    use proptest::prelude::*;

    #[test]
    fn default_config_round_trips() {
        let config = PatternConfig::default();
        assert_eq!(deserialize(&serialize(&config)).unwrap(), config);
    }

    #[test]
    fn decodes_links_from_the_browser_encoder() {
        // btoa(encodeURIComponent('{"linePattern":"ab","fontSize":60,...}'))
        let json = r##"{"linePattern":"a b","fontSize":"60","color":"#ffffff","backgroundColor":"#000000","rotation":45,"lineHeight":15,"letterSpacing":70,"fontFamily":"Syne Mono","spicy":false,"satisfy":true,"activePack":"Wise"}"##;
        let escaped = utf8_percent_encode(json, URI_COMPONENT).to_string();
        assert!(escaped.starts_with("%7B%22linePattern%22%3A%22a%20b%22"));
        let config = deserialize(&format!("#{}", STANDARD.encode(escaped))).unwrap();
        assert_eq!(config.line_pattern, "a b");
        assert_eq!(config.font_size, 60);
        assert_eq!(config.font_family, FontFamily::SyneMono);
        assert!(config.satisfy);
        assert!(!config.colorize);
    }

    #[test]
    fn malformed_inputs_are_reported() {
        for bad in ["", "#", "!!!not-base64!!!", "aGVsbG8=", "JUZGJUZG"] {
            match deserialize(bad) {
                Err(Error::MalformedConfig(_)) => {}
                other => panic!("{bad:?} should be malformed, got {other:?}"),
            }
        }
    }

    #[test]
    fn links_without_padding_decode() {
        let config = PatternConfig {
            line_pattern: "ab".into(),
            ..Default::default()
        };
        let encoded = serialize(&config);
        let stripped = encoded.trim_end_matches('=');
        assert_eq!(deserialize(stripped).unwrap(), config);
    }

    #[test]
    fn oversized_link_values_are_clamped() {
        let json = r##"{"linePattern":"█████","fontSize":4294967295,"color":"#ffffff","backgroundColor":"#000000","rotation":45,"lineHeight":4294967295,"letterSpacing":70,"fontFamily":"VT323","repeatAmount":4294967295}"##;
        let escaped = utf8_percent_encode(json, URI_COMPONENT).to_string();
        let config = deserialize(&STANDARD.encode(escaped)).unwrap();
        assert_eq!(config.repeat_amount, Some(crate::constants::MAX_REPEAT));
        assert_eq!(config.font_size, crate::constants::MAX_FONT_SIZE);
        assert_eq!(config.line_height, crate::constants::MAX_LINE_HEIGHT);
    }

    #[test]
    fn shareable_url_replaces_fragment() {
        let config = PatternConfig::default();
        let url = shareable_url("https://example.com/app/#old", &config);
        assert!(url.starts_with("https://example.com/app/#"));
        assert!(!url.contains("old"));
        let fragment = fragment_of(&url).unwrap();
        assert_eq!(deserialize(fragment).unwrap(), config);
    }

    #[test]
    fn fragment_extraction() {
        assert_eq!(fragment_of("https://x.y/#abc"), Some("abc"));
        assert_eq!(fragment_of("#abc"), Some("abc"));
        assert_eq!(fragment_of("abc"), Some("abc"));
        assert_eq!(fragment_of("https://x.y/#"), None);
        assert_eq!(fragment_of(""), None);
    }

    fn arb_config() -> impl Strategy<Value = PatternConfig> {
        (
            "\\PC{1,8}",
            1u32..400,
            (0u32..=0xffffff, 0u32..=0xffffff),
            -360i32..360,
            (0u32..40, -50i32..200),
            prop::sample::select(FontFamily::ALL.to_vec()),
            prop::option::of(prop::sample::select(vec!["Favs", "Slim", "Custom"])),
            (any::<bool>(), any::<bool>(), any::<bool>()),
            prop::option::of(1u32..500),
            prop::option::of(prop::sample::select(vec![0.5f64, 1.0, 2.5, 3.75])),
        )
            .prop_map(
                |(
                    line_pattern,
                    font_size,
                    (color, background),
                    rotation,
                    (line_height, letter_spacing),
                    font_family,
                    active_pack,
                    (spicy, satisfy, colorize),
                    repeat_amount,
                    container_scale,
                )| PatternConfig {
                    line_pattern,
                    font_size,
                    color: format!("#{color:06x}"),
                    background_color: format!("#{background:06x}"),
                    rotation,
                    line_height,
                    letter_spacing,
                    font_family,
                    active_pack: active_pack.map(str::to_string),
                    spicy,
                    satisfy,
                    colorize,
                    repeat_amount,
                    container_scale,
                },
            )
    }

    proptest! {
        #[test]
        fn serialize_round_trips(config in arb_config()) {
            let encoded = serialize(&config);
            prop_assert!(encoded.is_ascii());
            prop_assert_eq!(deserialize(&encoded).unwrap(), config);
        }
    }
}
