//! QR code encoding support
//!
//! This module hosts the minimal segmentation encoder and the types it
//! produces: segment [`Mode`]s, symbol [`Version`]s with their capacity
//! arithmetic, and byte mode [`CharsetEncoder`]s with their ECI
//! assignments. Bit stream assembly is left to the consumer; a
//! [`minimal::ResultList`] exposes everything an assembler needs.

pub mod charset;
pub mod minimal;
pub mod mode;
pub mod version;

pub use charset::{eci_of, CharsetEncoder};
pub use minimal::{MinimalEncoder, ResultList, Segment};
pub use mode::Mode;
pub use version::{EcLevel, Version};
