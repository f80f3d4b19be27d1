//! 4x4 homogeneous transform matrices for 3D rendering pipelines.
//!
//! A [`Matrix4`] carries a cached [`MatrixProperties`] mask describing which
//! structural patterns its elements are known to satisfy. Operations consult
//! the mask to pick a specialized kernel, and narrow or recompute the mask so
//! that it never claims a pattern the elements do not have.

#[macro_use]
mod macros;

#[cfg(feature = "benchmark")]
pub mod benchmark;
pub mod convention;
pub mod frustum;
#[cfg(feature = "fuzzing")]
pub mod fuzzing;
pub mod matrix;
pub mod properties;

#[cfg(test)]
mod testing;

pub use convention::{ClipConvention, DepthRange, Handedness};
pub use frustum::{FrustumCorner, FrustumPlane};
pub use matrix::{AffineSpan, Matrix4, Viewport};
pub use properties::MatrixProperties;
