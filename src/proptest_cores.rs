//! Property-based tests for the pattern matcher and the minimal encoder

use proptest::prelude::*;

use crate::pattern::pattern_match_variance;
use crate::qrcode::{EcLevel, MinimalEncoder, Mode, Version};

const START_PATTERN: [u32; 8] = [8, 1, 1, 1, 1, 1, 1, 3];

proptest! {
    /// Scaling a pattern by any positive factor keeps a perfect score
    #[test]
    fn prop_exact_multiples_have_zero_variance(k in 1u32..50) {
        let counters: Vec<u32> = START_PATTERN.iter().map(|&c| c * k).collect();
        prop_assert_eq!(pattern_match_variance(&counters, &START_PATTERN, 255), 0);
    }

    /// Fewer observed pixels than pattern units can never match
    #[test]
    fn prop_underflow_is_no_match(counters in prop::collection::vec(0u32..3, 8)) {
        prop_assert_eq!(pattern_match_variance(&counters, &START_PATTERN, 255), u32::MAX);
    }

    /// A digit-only input always collapses into one numeric segment
    #[test]
    fn prop_digits_become_one_numeric_segment(data in "[0-9]{1,60}") {
        let result = MinimalEncoder::encode(&data, None, None, false, EcLevel::L).unwrap();
        let segments = result.segments();
        prop_assert_eq!(segments.len(), 2);
        prop_assert_eq!(segments[0].mode, Mode::Numeric);
        prop_assert_eq!(segments[0].character_length, data.len());
        prop_assert_eq!(segments[1].mode, Mode::Terminator);
    }

    /// The minimal solution is never worse than a plain byte encoding
    #[test]
    fn prop_minimal_beats_plain_byte_encoding(data in "[a-zA-Z0-9 ]{1,40}") {
        let result = MinimalEncoder::encode(&data, None, None, false, EcLevel::L).unwrap();
        // one byte segment plus terminator, sized for version class 1-9
        let byte_size = 4 + 8 + 8 * data.len() + 4;
        prop_assert!(result.bit_size() <= byte_size);
    }

    /// The reported version is the smallest of its class that fits
    #[test]
    fn prop_version_sizing_is_minimal_in_class(data in "[A-Z0-9 ]{1,120}") {
        let result = MinimalEncoder::encode(&data, None, None, false, EcLevel::M).unwrap();
        let version = result.version();
        let size = result.bit_size();
        prop_assert!(Version::will_fit(size, version, EcLevel::M));
        let lower = match version.number() {
            1..=9 => 1,
            10..=26 => 10,
            _ => 27,
        };
        if version.number() > lower {
            prop_assert!(!Version::will_fit(
                size,
                Version::new(version.number() - 1),
                EcLevel::M
            ));
        }
    }
}
