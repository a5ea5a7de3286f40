#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the io module.
pub mod error;

/// OpenEXR float image reading.
pub mod exr;

/// High-level functions to read any supported image format.
pub mod functional;

/// PNG image encoding and decoding.
pub mod png;

pub use crate::error::IoError;
