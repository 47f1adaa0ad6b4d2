//! Bar width pattern matching
//!
//! Scores how closely a set of observed black/white run lengths matches a
//! target guard pattern, in 8-bit fixed point arithmetic.
//!
//! Rust port based on Java code from the ZXing library.
//! Original Java code copyright (C) 2009 ZXing authors.
//! Licensed under Apache License 2.0

/// Fixed point shift used by [`pattern_match_variance`]
pub const INTEGER_MATH_SHIFT: u32 = 8;

/// Fixed point scale, `1 << INTEGER_MATH_SHIFT`
pub const PATTERN_MATCH_RESULT_SCALE_FACTOR: u32 = 1 << INTEGER_MATH_SHIFT;

/// Determines how closely a set of observed counts of runs of black/white
/// values matches a given target pattern.
///
/// The result is the ratio of the total variance from the expected pattern
/// proportions across all pattern elements to the total observed width,
/// scaled by 256. So 0 means a perfect match and 256 means the total
/// variance equals the pattern length.
///
/// Returns `u32::MAX` to signal no match, either because the observed
/// runs are narrower than one pixel per pattern unit, or because a single
/// counter deviates by more than `max_individual_variance` (itself scaled
/// by the unit bar width).
pub fn pattern_match_variance(
    counters: &[u32],
    pattern: &[u32],
    max_individual_variance: u32,
) -> u32 {
    let total: u32 = counters.iter().sum();
    let pattern_length: u32 = pattern.iter().sum();
    if total < pattern_length {
        // Less than one pixel per unit of bar width; too small to match
        // reliably.
        return u32::MAX;
    }

    let unit_bar_width = (total << INTEGER_MATH_SHIFT) / pattern_length;
    let max_individual_variance = (max_individual_variance * unit_bar_width) >> INTEGER_MATH_SHIFT;

    let mut total_variance = 0;
    for (&counter, &expected) in counters.iter().zip(pattern) {
        let counter = counter << INTEGER_MATH_SHIFT;
        let scaled_pattern = expected * unit_bar_width;
        let variance = if counter > scaled_pattern {
            counter - scaled_pattern
        } else {
            scaled_pattern - counter
        };
        if variance > max_individual_variance {
            return u32::MAX;
        }
        total_variance += variance;
    }
    total_variance / total
}
