//! Loupe engine crate.
//!
//! Progressive, interruptible rendering of N-dimensional image data onto a
//! 2D canvas: sources and converters, the parallel projection kernel, the
//! multi-resolution renderer and the painter thread that drives it.

pub mod coords;
pub mod error;
pub mod logging;
pub mod paint;
pub mod painter;
pub mod render;
pub mod source;
pub mod time;
pub mod viewer;

pub use error::RenderError;
