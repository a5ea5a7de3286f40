//! Pixel interpolation for the resampling step.
//!
//! The sampler is bilinear with a zero-padding boundary: each of the four
//! stencil corners contributes zero when it falls outside the image.

mod bilinear;

pub(crate) use bilinear::bilinear_interpolation;
