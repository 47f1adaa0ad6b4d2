//! Integration tests for the minimal QR segmentation encoder

#![cfg(feature = "qrcode")]

use zedxing::qrcode::{EcLevel, MinimalEncoder, Mode, Version};
use zedxing::Error;

fn encode(text: &str) -> zedxing::qrcode::ResultList {
    MinimalEncoder::encode(text, None, None, false, EcLevel::L).unwrap()
}

#[test]
fn alphanumeric_beats_byte_for_uppercase_input() {
    let result = encode("ABCDE");
    let segments = result.segments();

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].mode, Mode::Alphanumeric);
    assert_eq!(segments[0].from_position, 0);
    assert_eq!(segments[0].character_length, 5);
    assert_eq!(segments[1].mode, Mode::Terminator);

    // 4 mode + 9 count + 2*11 + 6 payload + 4 terminator bits; the byte
    // rendition would cost 4 + 8 + 5*8 + 4 = 56
    assert_eq!(result.bit_size(), 45);
    assert_eq!(result.version().number(), 1);
}

#[test]
fn mixed_scripts_prefer_one_utf8_run() {
    // Arabic aleph followed by Hebrew aleph: one UTF-8 run undercuts a
    // charset switch per character
    let result = encode("\u{0625}\u{05D0}");
    let segments = result.segments();

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].mode, Mode::Eci);
    assert_eq!(result.charset(segments[0].charset_index).name(), "UTF-8");
    assert_eq!(segments[1].mode, Mode::Byte);
    assert_eq!(segments[1].character_length, 2);
    assert_eq!(result.character_count_indicator(&segments[1]), 4);
    assert_eq!(segments[2].mode, Mode::Terminator);

    // strictly smaller than ECI(ISO-8859-6) BYTE(1) ECI(ISO-8859-8)
    // BYTE(1) at 12 + 20 + 12 + 20 + 4 = 68
    assert_eq!(result.bit_size(), 60);
}

#[test]
fn repeated_script_prefers_dedicated_charsets() {
    // with the Arabic character doubled the two-charset split wins
    let result = encode("\u{0625}\u{0625}\u{05D0}");
    let segments = result.segments();

    assert_eq!(segments.len(), 5);
    assert_eq!(segments[0].mode, Mode::Eci);
    assert_eq!(
        result.charset(segments[0].charset_index).name(),
        "ISO-8859-6"
    );
    assert_eq!(segments[1].mode, Mode::Byte);
    assert_eq!(segments[1].character_length, 2);
    assert_eq!(segments[2].mode, Mode::Eci);
    assert_eq!(
        result.charset(segments[2].charset_index).name(),
        "ISO-8859-8"
    );
    assert_eq!(segments[3].mode, Mode::Byte);
    assert_eq!(segments[3].character_length, 1);
    assert_eq!(segments[4].mode, Mode::Terminator);
    assert_eq!(result.bit_size(), 76);
}

#[test]
fn gs1_numeric_input_leads_with_fnc1() {
    let result = MinimalEncoder::encode("1234", None, None, true, EcLevel::L).unwrap();
    let segments = result.segments();

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].mode, Mode::Fnc1FirstPosition);
    assert_eq!(segments[1].mode, Mode::Numeric);
    assert_eq!(segments[1].character_length, 4);
    assert_eq!(segments[2].mode, Mode::Terminator);

    // FNC1 4 + (4 mode + 10 count + 10 + 4 payload) + 4 terminator
    assert_eq!(result.bit_size(), 36);
}

#[test]
fn gs1_with_late_eci_gets_a_default_charset_lead() {
    // the minimal path switches charset mid-stream, so GS1 placement
    // prepends the default charset ECI and slots FNC1 after it
    let result = MinimalEncoder::encode("1234\u{0625}", None, None, true, EcLevel::L).unwrap();
    let modes: Vec<Mode> = result.segments().iter().map(|s| s.mode).collect();

    assert_eq!(
        modes,
        [
            Mode::Eci,
            Mode::Fnc1FirstPosition,
            Mode::Numeric,
            Mode::Eci,
            Mode::Byte,
            Mode::Terminator
        ]
    );
    let segments = result.segments();
    assert_eq!(
        result.charset(segments[0].charset_index).name(),
        "ISO-8859-1"
    );
    assert_eq!(
        result.charset(segments[3].charset_index).name(),
        "ISO-8859-6"
    );
    assert_eq!(result.bit_size(), 80);
}

#[test]
fn version_sizing_picks_the_smallest_fitting_version() {
    // 300 digits cost 4 + 10 + 1000 + 4 bits = 128 codewords, which
    // fits version 6 at level L but not version 5
    let digits: String = "7".repeat(300);
    let result = encode(&digits);

    assert_eq!(result.bit_size(), 1018);
    let version = result.version();
    assert_eq!(version.number(), 6);
    assert!(Version::will_fit(result.bit_size(), version, EcLevel::L));
    assert!(!Version::will_fit(
        result.bit_size(),
        Version::new(5),
        EcLevel::L
    ));
}

#[test]
fn preset_version_is_resized_within_its_class() {
    let result =
        MinimalEncoder::encode("ABCDE", Some(Version::new(15)), None, false, EcLevel::L).unwrap();
    // solved with medium class count widths, then shrunk to the class
    // floor
    assert_eq!(result.bit_size(), 4 + 11 + 28 + 4);
    assert_eq!(result.version().number(), 10);
}

#[test]
fn oversized_input_for_preset_version_class_is_rejected() {
    let text = "A".repeat(350);
    let result = MinimalEncoder::encode(&text, Some(Version::new(1)), None, false, EcLevel::L);
    assert_eq!(result.err(), Some(Error::DataTooBig));
}

#[test]
fn oversized_input_is_rejected_across_all_classes() {
    let text = "A".repeat(4400);
    let result = MinimalEncoder::encode(&text, None, None, false, EcLevel::L);
    assert_eq!(result.err(), Some(Error::DataTooBig));
}

#[test]
fn priority_charset_restricts_byte_edges() {
    // without a priority the two-character input stays in ISO-8859-6;
    // with UTF-8 preferred every byte edge uses UTF-8
    let free = encode("\u{0625}\u{0625}");
    assert_eq!(
        free.charset(free.segments()[0].charset_index).name(),
        "ISO-8859-6"
    );

    let pinned = MinimalEncoder::encode(
        "\u{0625}\u{0625}",
        None,
        Some(zedxing::qrcode::CharsetEncoder::Utf8),
        false,
        EcLevel::L,
    )
    .unwrap();
    let segments = pinned.segments();
    assert_eq!(segments[0].mode, Mode::Eci);
    assert_eq!(pinned.charset(segments[0].charset_index).name(), "UTF-8");
    assert_eq!(pinned.character_count_indicator(&segments[1]), 4);
}

#[test]
fn kanji_mode_is_chosen_for_double_byte_characters() {
    let result = encode("茗荷");
    let segments = result.segments();

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].mode, Mode::Kanji);
    assert_eq!(segments[0].character_length, 2);
    // 4 mode + 8 count + 2*13 payload + 4 terminator
    assert_eq!(result.bit_size(), 42);
}

#[test]
fn segments_render_in_debug_shape() {
    let result = MinimalEncoder::encode("1234", None, None, true, EcLevel::L).unwrap();
    assert_eq!(
        result.to_string(),
        "FNC1_FIRST_POSITION(),NUMERIC(1234),TERMINATOR()"
    );
}
