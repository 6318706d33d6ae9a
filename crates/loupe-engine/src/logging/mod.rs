//! Logging utilities.
//!
//! Centralizes logger initialization. Everything else in the engine talks to
//! the `log` facade only; pass timings go to `debug`, policy changes to
//! `info`, and faults inside a pass to `error`.

mod init;

pub use init::{init_logging, LoggingConfig};
