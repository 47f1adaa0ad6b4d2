//! PDF417 start/stop pattern detection
//!
//! Locates the start and stop guard patterns of a PDF417 symbol by
//! stepping over image rows, tolerating pixel drift between rows and
//! scan noise, and estimates the codeword width in pixels. Upright and
//! 180° flipped symbols are both handled.
//!
//! Rust port based on Java code from the ZXing library.
//! Original Java code copyright (C) 2009 ZXing authors.
//! Licensed under Apache License 2.0

use crate::matrix::{BitGrid, BitMatrix, Rotate180};
use crate::pattern::{pattern_match_variance, PATTERN_MATCH_RESULT_SCALE_FACTOR};
use crate::point::ResultPoint;
use crate::{Error, Result};

/// Modules per PDF417 codeword column
pub const MODULES_IN_CODEWORD: u32 = 17;

const INDEXES_START_PATTERN: [usize; 4] = [0, 4, 1, 5];
const INDEXES_STOP_PATTERN: [usize; 4] = [6, 2, 7, 3];
const MAX_AVG_VARIANCE: u32 = (PATTERN_MATCH_RESULT_SCALE_FACTOR as f32 * 0.42) as u32;
const MAX_INDIVIDUAL_VARIANCE: u32 = (PATTERN_MATCH_RESULT_SCALE_FACTOR as f32 * 0.8) as u32;

// B S B S B S B S bar/space pattern
// 11111111 0 1 0 1 0 1 000
const START_PATTERN: [u32; 8] = [8, 1, 1, 1, 1, 1, 1, 3];
// 1111111 0 1 000 1 0 1 00 1
const STOP_PATTERN: [u32; 9] = [7, 1, 1, 3, 1, 1, 1, 2, 1];
const MODULE_COUNT_STOP_PATTERN: u32 = 18;

const MAX_PIXEL_DRIFT: i32 = 3;
const SKIPPED_ROW_COUNT_MAX: i32 = 50;
// a symbol has at least 3 rows of at least 3 module widths each, so it is
// at least 9 pixels tall and a 5 row step cannot jump over it
const ROW_STEP: usize = 5;

/// Result of a successful PDF417 detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdf417DetectorResult {
    /// Detected vertices:
    /// 0 top left, 1 bottom left, 2 top right, 3 bottom right of the
    /// barcode; 4 through 7 the matching corners of the codeword area.
    /// The stop-side slots stay empty when only the start pattern was
    /// found.
    pub vertices: [Option<ResultPoint>; 8],
    /// Estimated pixels per 17 module codeword column
    pub codeword_width: f32,
    /// Whether the vertices are expressed in the 180° rotated view of
    /// the image
    pub rotated: bool,
}

/// Detect a PDF417 symbol in an image. Only 0 and 180 degree rotations
/// are checked: if the top-left vertex is missing upright, detection is
/// retried once on a [`Rotate180`] view.
pub fn detect(image: &BitMatrix, try_harder: bool) -> Result<Pdf417DetectorResult> {
    let mut rotated = false;
    let mut vertices = find_vertices(image, try_harder);
    if vertices[0].is_none() {
        // maybe the image is rotated 180 degrees?
        rotated = true;
        vertices = find_vertices(&Rotate180(image), try_harder);
    }
    if vertices[0].is_none() {
        return Err(Error::NotFound);
    }

    let codeword_width = codeword_width_from_start_stop_pattern(&vertices)?;
    if codeword_width < MODULES_IN_CODEWORD as f32 {
        return Err(Error::NotFound);
    }

    Ok(Pdf417DetectorResult {
        vertices,
        codeword_width,
        rotated,
    })
}

/// Locate the vertices of a symbol using the start and stop patterns as
/// locators.
// TODO support several barcodes per image by restarting the search after
// the end of the start pattern
fn find_vertices<G: BitGrid>(matrix: &G, _try_harder: bool) -> [Option<ResultPoint>; 8] {
    let height = matrix.height();
    let width = matrix.width();

    let mut result = [None; 8];
    copy_to_result(
        &mut result,
        find_rows_with_pattern(matrix, height, width, &START_PATTERN),
        &INDEXES_START_PATTERN,
    );
    copy_to_result(
        &mut result,
        find_rows_with_pattern(matrix, height, width, &STOP_PATTERN),
        &INDEXES_STOP_PATTERN,
    );
    result
}

fn copy_to_result(
    result: &mut [Option<ResultPoint>; 8],
    row_result: [Option<ResultPoint>; 4],
    indexes: &[usize; 4],
) {
    for (i, &index) in indexes.iter().enumerate() {
        result[index] = row_result[i];
    }
}

/// Find the top and bottom rows where a guard pattern matches.
///
/// Rows are scanned top-down in steps of [`ROW_STEP`] until the pattern
/// is hit, then single rows backtrack to the earliest consecutive match.
/// From there every following row must match within 5 pixels of the
/// previous hit on both offsets; rows that do not are counted as skipped
/// and the scan stops once too many were skipped in sequence.
fn find_rows_with_pattern<G: BitGrid>(
    matrix: &G,
    height: usize,
    width: usize,
    pattern: &[u32],
) -> [Option<ResultPoint>; 4] {
    let mut result = [None; 4];
    let mut counters = vec![0u32; pattern.len()];
    let mut found = false;

    // first row that contains the pattern
    let mut start_row = 0;
    while start_row < height {
        if let Some(mut loc) =
            find_guard_pattern(matrix, 0, start_row, width, false, pattern, &mut counters)
        {
            while start_row > 0 {
                start_row -= 1;
                match find_guard_pattern(matrix, 0, start_row, width, false, pattern, &mut counters)
                {
                    Some(previous_row_loc) => loc = previous_row_loc,
                    None => {
                        start_row += 1;
                        break;
                    }
                }
            }
            result[0] = Some(ResultPoint::new(loc[0] as f32, start_row as f32));
            result[1] = Some(ResultPoint::new(loc[1] as f32, start_row as f32));
            found = true;
            break;
        }
        start_row += ROW_STEP;
    }

    // last row of the current symbol that contains the pattern
    if found {
        let mut skipped_row_count: i32 = 0;
        let mut previous_row_loc = [
            result[0].map(|p| p.x as usize).unwrap_or(0),
            result[1].map(|p| p.x as usize).unwrap_or(0),
        ];
        let mut stop_row = start_row + 1;
        while stop_row < height {
            let loc = find_guard_pattern(
                matrix,
                previous_row_loc[0],
                stop_row,
                width,
                false,
                pattern,
                &mut counters,
            );
            match loc {
                Some(loc)
                    if (previous_row_loc[0] as i32 - loc[0] as i32).abs() < 5
                        && (previous_row_loc[1] as i32 - loc[1] as i32).abs() < 5 =>
                {
                    previous_row_loc = loc;
                    skipped_row_count = 0;
                }
                _ => {
                    if skipped_row_count > SKIPPED_ROW_COUNT_MAX {
                        break;
                    }
                    skipped_row_count += 1;
                }
            }
            stop_row += 1;
        }
        stop_row -= skipped_row_count as usize;
        result[2] = Some(ResultPoint::new(previous_row_loc[0] as f32, stop_row as f32));
        result[3] = Some(ResultPoint::new(previous_row_loc[1] as f32, stop_row as f32));
    }

    result
}

/// Search a single row for the guard pattern, starting at `column`.
///
/// Stray black pixels left of the start column are tolerated up to
/// [`MAX_PIXEL_DRIFT`]. Alternating run lengths accumulate into
/// `counters`; once a full window is collected it is scored against the
/// pattern, and on a miss the window slides forward by one bar/space
/// pair. Returns the start and end column of the match.
fn find_guard_pattern<G: BitGrid>(
    matrix: &G,
    column: usize,
    row: usize,
    width: usize,
    white_first: bool,
    pattern: &[u32],
    counters: &mut [u32],
) -> Option<[usize; 2]> {
    counters.fill(0);
    let pattern_length = pattern.len();
    let mut is_white = white_first;
    let mut counter_position = 0;
    let mut pattern_start = column;
    let mut pixel_drift = 0;

    while matrix.get(pattern_start, row) && pattern_start > 0 && pixel_drift < MAX_PIXEL_DRIFT {
        pixel_drift += 1;
        pattern_start -= 1;
    }

    let mut x = pattern_start;
    while x < width {
        let pixel = matrix.get(x, row);
        if pixel ^ is_white {
            counters[counter_position] += 1;
        } else {
            if counter_position == pattern_length - 1 {
                if pattern_match_variance(counters, pattern, MAX_INDIVIDUAL_VARIANCE)
                    < MAX_AVG_VARIANCE
                {
                    return Some([pattern_start, x]);
                }
                pattern_start += (counters[0] + counters[1]) as usize;
                counters.copy_within(2.., 0);
                counters[pattern_length - 2] = 0;
                counters[pattern_length - 1] = 0;
                counter_position -= 1;
            } else {
                counter_position += 1;
            }
            counters[counter_position] = 1;
            is_white = !is_white;
        }
        x += 1;
    }
    if counter_position == pattern_length - 1
        && pattern_match_variance(counters, pattern, MAX_INDIVIDUAL_VARIANCE) < MAX_AVG_VARIANCE
    {
        return Some([pattern_start, x - 1]);
    }
    None
}

/// Mean width of one located pattern: the average of its top and bottom
/// horizontal extents
fn codeword_width_from_pattern(coordinates: &[ResultPoint; 4]) -> f32 {
    (ResultPoint::distance(coordinates[0], coordinates[1])
        + ResultPoint::distance(coordinates[2], coordinates[3]))
        / 2.0
}

/// Estimate pixels per codeword column from the start pattern, refined
/// by the stop pattern when it was found.
///
/// The start pattern spans one 17 module codeword; the stop pattern is
/// 18 modules wide and is rescaled accordingly.
fn codeword_width_from_start_stop_pattern(vertices: &[Option<ResultPoint>; 8]) -> Result<f32> {
    let start_coordinates =
        pattern_coordinates(vertices, &INDEXES_START_PATTERN).ok_or(Error::NotFound)?;
    let start_pattern_width = codeword_width_from_pattern(&start_coordinates);

    match pattern_coordinates(vertices, &INDEXES_STOP_PATTERN) {
        None => Ok(start_pattern_width),
        Some(stop_coordinates) => Ok((start_pattern_width
            + codeword_width_from_pattern(&stop_coordinates) * MODULES_IN_CODEWORD as f32
                / MODULE_COUNT_STOP_PATTERN as f32)
            / 2.0),
    }
}

fn pattern_coordinates(
    vertices: &[Option<ResultPoint>; 8],
    indexes: &[usize; 4],
) -> Option<[ResultPoint; 4]> {
    let mut result = [ResultPoint::default(); 4];
    for (slot, &index) in result.iter_mut().zip(indexes) {
        *slot = vertices[index]?;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Paint alternating runs, first run black, at the given module
    /// width; returns the column one past the painted span
    fn paint_runs(matrix: &mut BitMatrix, x: usize, pattern: &[u32], module_width: usize) -> usize {
        let mut x = x;
        for (i, &run) in pattern.iter().enumerate() {
            let run_px = run as usize * module_width;
            if i % 2 == 0 {
                matrix.set_region(x, 0, run_px, matrix.height());
            }
            x += run_px;
        }
        x
    }

    #[test]
    fn test_guard_pattern_exact_row() {
        let mut matrix = BitMatrix::new(120, 4);
        // leading quiet zone, then the start pattern at 3 px per module,
        // closed by a black bar so the trailing white run has exact width
        let end = paint_runs(&mut matrix, 12, &START_PATTERN, 3);
        matrix.set_region(end, 0, 6, matrix.height());

        let mut counters = [0u32; 8];
        let loc = find_guard_pattern(&matrix, 0, 1, 120, false, &START_PATTERN, &mut counters);
        assert_eq!(loc, Some([12, 63]));
    }

    #[test]
    fn test_guard_pattern_tolerates_left_drift() {
        let mut matrix = BitMatrix::new(120, 4);
        let end = paint_runs(&mut matrix, 12, &START_PATTERN, 3);
        matrix.set_region(end, 0, 6, matrix.height());

        // start the search two pixels into the leading black bar
        let mut counters = [0u32; 8];
        let loc = find_guard_pattern(&matrix, 14, 1, 120, false, &START_PATTERN, &mut counters);
        assert_eq!(loc, Some([12, 63]));
    }

    #[test]
    fn test_guard_pattern_missing() {
        let matrix = BitMatrix::new(120, 4);
        let mut counters = [0u32; 8];
        assert_eq!(
            find_guard_pattern(&matrix, 0, 1, 120, false, &START_PATTERN, &mut counters),
            None
        );
    }

    #[test]
    fn test_empty_image_is_not_found() {
        let matrix = BitMatrix::new(60, 60);
        assert_eq!(detect(&matrix, false), Err(Error::NotFound));
    }
}
