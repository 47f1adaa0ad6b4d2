//! Character sets for byte mode segments
//!
//! QR byte segments carry text in one of several character sets,
//! announced by an Extended Channel Interpretation (ECI) marker when the
//! set differs from the default ISO-8859-1 interpretation.
//!
//! The ISO-8859 family, UTF-8 and Shift JIS classification are backed by
//! `encoding_rs`. Two encoders are carried directly because the WHATWG
//! encoding standard cannot express them for output: strict ISO-8859-1
//! (its closest `encoding_rs` label, windows-1252, diverges on
//! 0x80..0x9F) and UTF-16BE (whose `encoding_rs` encoder is defined to
//! emit UTF-8).

use encoding_rs::{
    Encoding, ISO_8859_10, ISO_8859_13, ISO_8859_14, ISO_8859_15, ISO_8859_16, ISO_8859_2,
    ISO_8859_3, ISO_8859_4, ISO_8859_5, ISO_8859_6, ISO_8859_7, ISO_8859_8, SHIFT_JIS,
};

/// A character set a byte segment can be encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetEncoder {
    /// ISO-8859-1, the default interpretation of byte segments
    Latin1,
    /// One of the remaining ISO-8859 parts
    Iso(&'static Encoding),
    /// UTF-8
    Utf8,
    /// UTF-16 big endian, without a byte order mark
    Utf16Be,
}

impl CharsetEncoder {
    /// Canonical charset name
    pub fn name(&self) -> &'static str {
        match self {
            CharsetEncoder::Latin1 => "ISO-8859-1",
            CharsetEncoder::Iso(encoding) => encoding.name(),
            CharsetEncoder::Utf8 => "UTF-8",
            CharsetEncoder::Utf16Be => "UTF-16BE",
        }
    }

    /// The encoder for ISO-8859-`part`, if that part exists and is
    /// expressible: parts 9, 11 and 12 are not (12 was never published,
    /// 9 and 11 only exist as windows codepage aliases)
    pub fn iso_part(part: u8) -> Option<CharsetEncoder> {
        match part {
            1 => Some(CharsetEncoder::Latin1),
            2 => Some(CharsetEncoder::Iso(ISO_8859_2)),
            3 => Some(CharsetEncoder::Iso(ISO_8859_3)),
            4 => Some(CharsetEncoder::Iso(ISO_8859_4)),
            5 => Some(CharsetEncoder::Iso(ISO_8859_5)),
            6 => Some(CharsetEncoder::Iso(ISO_8859_6)),
            7 => Some(CharsetEncoder::Iso(ISO_8859_7)),
            8 => Some(CharsetEncoder::Iso(ISO_8859_8)),
            10 => Some(CharsetEncoder::Iso(ISO_8859_10)),
            13 => Some(CharsetEncoder::Iso(ISO_8859_13)),
            14 => Some(CharsetEncoder::Iso(ISO_8859_14)),
            15 => Some(CharsetEncoder::Iso(ISO_8859_15)),
            16 => Some(CharsetEncoder::Iso(ISO_8859_16)),
            _ => None,
        }
    }

    /// Whether this charset can represent the character
    pub fn can_encode(&self, c: char) -> bool {
        match self {
            CharsetEncoder::Latin1 => (c as u32) <= 0xFF,
            CharsetEncoder::Iso(encoding) => {
                let mut buf = [0u8; 4];
                let (_, _, had_errors) = encoding.encode(c.encode_utf8(&mut buf));
                !had_errors
            }
            CharsetEncoder::Utf8 | CharsetEncoder::Utf16Be => true,
        }
    }

    /// Encode a string; unmappable characters must have been rejected by
    /// [`CharsetEncoder::can_encode`] beforehand
    pub fn encode(&self, s: &str) -> Vec<u8> {
        match self {
            CharsetEncoder::Latin1 => s.chars().map(|c| c as u32 as u8).collect(),
            CharsetEncoder::Iso(encoding) => encoding.encode(s).0.into_owned(),
            CharsetEncoder::Utf8 => s.as_bytes().to_vec(),
            CharsetEncoder::Utf16Be => {
                let mut bytes = Vec::with_capacity(s.len() * 2);
                for unit in s.encode_utf16() {
                    bytes.extend_from_slice(&unit.to_be_bytes());
                }
                bytes
            }
        }
    }

    /// Length of [`CharsetEncoder::encode`] without materialising it
    pub fn encoded_len(&self, s: &str) -> usize {
        match self {
            CharsetEncoder::Latin1 => s.chars().count(),
            CharsetEncoder::Iso(encoding) => encoding.encode(s).0.len(),
            CharsetEncoder::Utf8 => s.len(),
            CharsetEncoder::Utf16Be => s.encode_utf16().count() * 2,
        }
    }

    /// ECI assignment number of this charset, if registered
    pub fn eci(&self) -> Option<u8> {
        eci_of(self.name())
    }
}

/// ECI assignment number for a charset name, if registered.
///
/// The assignment numbers of all charsets this crate carries fit in
/// eight bits, which is what the ECI segment payload assumes.
pub fn eci_of(name: &str) -> Option<u8> {
    Some(match name {
        "ISO-8859-1" => 1,
        "ISO-8859-2" => 4,
        "ISO-8859-3" => 5,
        "ISO-8859-4" => 6,
        "ISO-8859-5" => 7,
        "ISO-8859-6" => 8,
        "ISO-8859-7" => 9,
        "ISO-8859-8" => 10,
        "ISO-8859-10" => 12,
        "ISO-8859-13" => 15,
        "ISO-8859-14" => 16,
        "ISO-8859-15" => 17,
        "ISO-8859-16" => 18,
        "UTF-16BE" => 25,
        "UTF-8" => 26,
        _ => return None,
    })
}

/// Whether the character encodes as a double byte sequence in Shift JIS
/// with a lead byte in the JIS X 0208 kanji ranges
pub(crate) fn is_double_byte_kanji(c: char) -> bool {
    let mut buf = [0u8; 4];
    let (bytes, _, had_errors) = SHIFT_JIS.encode(c.encode_utf8(&mut buf));
    if had_errors || bytes.len() != 2 {
        return false;
    }
    let lead = bytes[0];
    (0x81..=0x9F).contains(&lead) || (0xE0..=0xEB).contains(&lead)
}

/// Code of an alphanumeric mode character, if the character belongs to
/// the 45 symbol alphanumeric alphabet
pub(crate) fn alphanumeric_code(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'A'..='Z' => Some(c as u8 - b'A' + 10),
        ' ' => Some(36),
        '$' => Some(37),
        '%' => Some(38),
        '*' => Some(39),
        '+' => Some(40),
        '-' => Some(41),
        '.' => Some(42),
        '/' => Some(43),
        ':' => Some(44),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_boundaries() {
        assert!(CharsetEncoder::Latin1.can_encode('A'));
        assert!(CharsetEncoder::Latin1.can_encode('ÿ'));
        assert!(!CharsetEncoder::Latin1.can_encode('€'));
        assert_eq!(CharsetEncoder::Latin1.encode("Aé"), vec![0x41, 0xE9]);
    }

    #[test]
    fn test_iso_parts() {
        // Arabic aleph is ISO-8859-6 only, Hebrew aleph ISO-8859-8 only
        let arabic = '\u{0625}';
        let hebrew = '\u{05D0}';
        let iso6 = CharsetEncoder::iso_part(6).unwrap();
        let iso8 = CharsetEncoder::iso_part(8).unwrap();
        assert!(iso6.can_encode(arabic));
        assert!(!iso6.can_encode(hebrew));
        assert!(iso8.can_encode(hebrew));
        assert!(!iso8.can_encode(arabic));
        assert_eq!(iso6.encoded_len(&arabic.to_string()), 1);
    }

    #[test]
    fn test_unavailable_iso_parts() {
        assert!(CharsetEncoder::iso_part(9).is_none());
        assert!(CharsetEncoder::iso_part(11).is_none());
        assert!(CharsetEncoder::iso_part(12).is_none());
        assert!(CharsetEncoder::iso_part(0).is_none());
        assert!(CharsetEncoder::iso_part(17).is_none());
    }

    #[test]
    fn test_utf16be_encoding() {
        assert_eq!(
            CharsetEncoder::Utf16Be.encode("AB"),
            vec![0x00, 0x41, 0x00, 0x42]
        );
        // a supplementary plane character takes a surrogate pair
        assert_eq!(CharsetEncoder::Utf16Be.encoded_len("\u{1F600}"), 4);
        assert_eq!(CharsetEncoder::Utf8.encoded_len("\u{1F600}"), 4);
    }

    #[test]
    fn test_eci_registry() {
        assert_eq!(CharsetEncoder::Latin1.eci(), Some(1));
        assert_eq!(CharsetEncoder::iso_part(6).unwrap().eci(), Some(8));
        assert_eq!(CharsetEncoder::iso_part(16).unwrap().eci(), Some(18));
        assert_eq!(CharsetEncoder::Utf8.eci(), Some(26));
        assert_eq!(CharsetEncoder::Utf16Be.eci(), Some(25));
        assert_eq!(eci_of("KOI8-R"), None);
    }

    #[test]
    fn test_double_byte_kanji() {
        assert!(is_double_byte_kanji('茗'));
        assert!(is_double_byte_kanji('あ'));
        assert!(!is_double_byte_kanji('A'));
        // half width katakana encodes as a single byte
        assert!(!is_double_byte_kanji('ｱ'));
    }

    #[test]
    fn test_alphanumeric_codes() {
        assert_eq!(alphanumeric_code('0'), Some(0));
        assert_eq!(alphanumeric_code('9'), Some(9));
        assert_eq!(alphanumeric_code('A'), Some(10));
        assert_eq!(alphanumeric_code('Z'), Some(35));
        assert_eq!(alphanumeric_code(':'), Some(44));
        assert_eq!(alphanumeric_code('a'), None);
        assert_eq!(alphanumeric_code('#'), None);
    }
}
