//! Pixel model shared by converters, screen images and render targets.
//!
//! Scope:
//! - packed ARGB pixels (`argb`)
//! - sample-to-pixel [`Converter`]s and color lookup tables
//!
//! Geometry types remain in `coords`.

pub mod argb;
mod converter;
mod lut;

pub use converter::{Converter, LutConverter, RealArgbConverter};
pub use lut::{Lut, LUT_SIZE};
