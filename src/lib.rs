//! Zedxing Barcode Core Library
//!
//! A pure Rust library with the algorithmic cores of a barcode toolkit:
//! symbol geometry detection on binary images and minimal QR
//! segmentation. Based on the ZXing Java library.
//!
//! # Quick Start
//!
//! Detecting the white-bordered bounding box of a symbol:
//!
//! ```
//! use zedxing::{BitMatrix, WhiteRectangleDetector};
//!
//! let mut image = BitMatrix::new(40, 40);
//! image.set_region(12, 12, 16, 16);
//!
//! let detector = WhiteRectangleDetector::new(&image).unwrap();
//! let corners = detector.detect().unwrap();
//! println!("topmost corner at ({}, {})", corners[0].x, corners[0].y);
//! ```
//!
//! Computing a minimal QR segmentation:
//!
//! ```
//! use zedxing::qrcode::{EcLevel, MinimalEncoder};
//!
//! let result = MinimalEncoder::encode("HELLO 123", None, None, false, EcLevel::L).unwrap();
//! println!("{} bits as {result}", result.bit_size());
//! ```
//!
//! # Scope
//!
//! The crate operates on owned in-memory inputs and returns plain
//! values; image loading, binarization, bit stream assembly and error
//! correction coding belong to its consumers. Every entry point is a
//! synchronous pure function without process-wide state, so calls from
//! multiple threads are safe as long as each owns its inputs.
//!
//! # Modules
//!
//! - [`detector`] - White rectangle and PDF417 guard pattern detection
//! - [`pattern`] - Fixed point bar width variance scoring
//! - [`qrcode`] - Minimal QR segmentation and its supporting types
//! - [`matrix`] - Binary image handling
//! - [`error`] - Error types

pub mod detector;
pub mod error;
pub mod matrix;
pub mod pattern;
pub mod point;

#[cfg(feature = "qrcode")]
pub mod qrcode;

pub use detector::WhiteRectangleDetector;
pub use error::{Error, Result};
pub use matrix::{BitGrid, BitMatrix, Rotate180};
pub use point::ResultPoint;

#[cfg(all(test, feature = "qrcode"))]
mod proptest_cores;
