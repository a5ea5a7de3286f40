#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// flow field decoding from angle/magnitude encoded images.
pub mod flow;

/// sampling grid construction and normalization.
pub mod grid;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallelization utilities.
pub mod parallel;

/// image warping by flow fields.
pub mod warp;

pub use crate::parallel::ExecutionStrategy;
pub use crate::warp::{grid_sample, warp_by_flow};
