//! Time subsystem.
//!
//! Provides the accumulating [`StopWatch`] used to measure render passes. The
//! adaptive scale policy consumes these measurements, so they are kept
//! independent from any frame loop.

mod stop_watch;

pub use stop_watch::StopWatch;
