//! Integration tests for the PDF417 start/stop pattern detector

#![cfg(feature = "pdf417")]

use zedxing::detector::pdf417;
use zedxing::{BitGrid, BitMatrix, Error, Rotate180};

const START_PATTERN: [u32; 8] = [8, 1, 1, 1, 1, 1, 1, 3];
const STOP_PATTERN: [u32; 9] = [7, 1, 1, 3, 1, 1, 1, 2, 1];

/// Paint alternating bar/space runs over the full image height, first
/// run black; returns the column one past the painted span
fn paint_runs(image: &mut BitMatrix, x: usize, pattern: &[u32], module_width: usize) -> usize {
    let mut x = x;
    for (i, &run) in pattern.iter().enumerate() {
        let run_px = run as usize * module_width;
        if i % 2 == 0 {
            image.set_region(x, 0, run_px, image.height());
        }
        x += run_px;
    }
    x
}

/// A pixel-accurate symbol skeleton: start pattern immediately followed
/// by the stop pattern, 3 pixels per module, over a 140x30 image
fn synthetic_symbol() -> BitMatrix {
    let mut image = BitMatrix::new(140, 30);
    let after_start = paint_runs(&mut image, 10, &START_PATTERN, 3);
    paint_runs(&mut image, after_start, &STOP_PATTERN, 3);
    image
}

fn rotated_copy(image: &BitMatrix) -> BitMatrix {
    let view = Rotate180(image);
    let mut copy = BitMatrix::new(image.width(), image.height());
    for y in 0..view.height() {
        for x in 0..view.width() {
            if view.get(x, y) {
                copy.set(x, y);
            }
        }
    }
    copy
}

#[test]
fn detects_synthetic_symbol() {
    let image = synthetic_symbol();
    let result = pdf417::detect(&image, false).unwrap();

    assert!(!result.rotated);
    assert!(result.vertices.iter().all(|v| v.is_some()));
    // 17 modules of 3 pixels each
    assert!(result.codeword_width >= 51.0);
    assert_eq!(result.codeword_width, 51.0);

    let top_left = result.vertices[0].unwrap();
    let top_right = result.vertices[2].unwrap();
    let bottom_left = result.vertices[1].unwrap();
    assert_eq!(top_left.x, 10.0);
    assert_eq!(top_left.y, 0.0);
    assert_eq!(bottom_left.x, 10.0);
    assert!(top_right.x > top_left.x);
}

#[test]
fn start_and_stop_extents_match_the_painted_runs() {
    let image = synthetic_symbol();
    let result = pdf417::detect(&image, false).unwrap();

    // start pattern spans 17 modules from column 10, stop pattern 18
    // modules from there
    let start_left = result.vertices[0].unwrap();
    let start_right = result.vertices[4].unwrap();
    let stop_left = result.vertices[6].unwrap();
    let stop_right = result.vertices[2].unwrap();
    assert_eq!(start_right.x - start_left.x, 51.0);
    assert_eq!(stop_left.x, start_right.x);
    assert_eq!(stop_right.x - stop_left.x, 54.0);
}

#[test]
fn rotated_symbol_is_detected_through_the_flipped_view() {
    let image = synthetic_symbol();
    let upright = pdf417::detect(&image, false).unwrap();

    let rotated = rotated_copy(&image);
    let result = pdf417::detect(&rotated, false).unwrap();

    assert!(result.rotated);
    assert_eq!(result.codeword_width, upright.codeword_width);
    // coordinates in the flipped view match the upright detection
    assert_eq!(result.vertices, upright.vertices);
}

#[test]
fn single_pixel_modules_sit_on_the_width_floor() {
    // one pixel per module is the narrowest matchable rendering and
    // lands exactly on the 17 pixel codeword floor
    let mut image = BitMatrix::new(80, 30);
    let after_start = paint_runs(&mut image, 10, &START_PATTERN, 1);
    paint_runs(&mut image, after_start, &STOP_PATTERN, 1);

    let result = pdf417::detect(&image, false).unwrap();
    assert_eq!(result.codeword_width, 17.0);
}

#[test]
fn empty_image_is_not_found() {
    let image = BitMatrix::new(120, 40);
    assert_eq!(pdf417::detect(&image, false), Err(Error::NotFound));
}
