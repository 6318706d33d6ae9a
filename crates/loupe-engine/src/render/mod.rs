//! CPU rendering subsystem.
//!
//! [`InterruptibleProjector`] fills one [`ScreenImage`] in parallel and can be
//! cancelled mid-pass. [`MultiResolutionRenderer`] drives it over a ladder of
//! screen scales, publishing each finished buffer to a [`RenderTarget`].
//!
//! Convention:
//! - Screen images are row-major packed ARGB, top-left origin, +Y down.
//! - Scale index 0 is the finest level; higher indices are coarser.

mod buffers;
mod cancel;
mod config;
mod image;
mod multires;
mod policy;
mod projector;
mod request;
mod scales;
mod target;

pub use cancel::CancelToken;
pub use config::RendererConfig;
pub use image::ScreenImage;
pub use multires::{MultiResolutionRenderer, PassOutcome, PassReport, RendererHandle};
pub use policy::{FixedStart, HysteresisPolicy, ScalePolicy};
pub use projector::{DEFAULT_PASS_TIMEOUT, InterruptibleProjector};
pub use scales::ScreenScales;
pub use target::{BufferedImageTarget, RenderTarget};
