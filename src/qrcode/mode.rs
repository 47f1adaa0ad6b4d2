//! QR segment modes

use crate::qrcode::version::Version;

/// Per-segment encoding family.
///
/// The first four are data modes; `Eci`, `Fnc1FirstPosition` and
/// `Terminator` are control segments that carry no input characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
    Eci,
    Fnc1FirstPosition,
    Terminator,
}

impl Mode {
    /// The four bit mode indicator written ahead of each segment
    pub fn bits(self) -> u8 {
        match self {
            Mode::Numeric => 0x01,
            Mode::Alphanumeric => 0x02,
            Mode::Byte => 0x04,
            Mode::Kanji => 0x08,
            Mode::Eci => 0x07,
            Mode::Fnc1FirstPosition => 0x05,
            Mode::Terminator => 0x00,
        }
    }

    /// Width of the character count indicator for this mode at the given
    /// version; zero for control segments
    pub fn character_count_bits(self, version: Version) -> u32 {
        let number = version.number();
        let class = if number <= 9 {
            0
        } else if number <= 26 {
            1
        } else {
            2
        };
        match self {
            Mode::Numeric => [10, 12, 14][class],
            Mode::Alphanumeric => [9, 11, 13][class],
            Mode::Byte => [8, 16, 16][class],
            Mode::Kanji => [8, 10, 12][class],
            _ => 0,
        }
    }
}
