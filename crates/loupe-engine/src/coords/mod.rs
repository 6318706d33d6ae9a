//! Coordinate spaces and affine transforms.
//!
//! Spaces, source to screen:
//! - source: voxel/pixel indices of the data, integer at sample centers
//! - global: after the source's own calibration transform
//! - canvas: viewer pixels, origin top-left, +X right, +Y down
//! - screen image: pixels of one screen-scale buffer
//!
//! The renderer is generic over [`AffineTransform`]; [`Affine2`] and
//! [`Affine3`] are the two provided models.

mod affine2;
mod affine3;
mod canvas;
mod matrix;
mod transform;

pub use affine2::Affine2;
pub use affine3::Affine3;
pub use canvas::CanvasSize;
pub use transform::AffineTransform;
