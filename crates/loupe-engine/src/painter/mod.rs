//! Repaint scheduling.
//!
//! A [`PainterThread`] owns one [`Paintable`] and calls it on a dedicated
//! thread whenever a repaint was requested through its [`RepaintSignal`].
//! Requests arriving while a paint runs collapse into a single follow-up.

mod signal;
mod thread;

pub use signal::{PainterState, RepaintSignal};
pub use thread::PainterThread;

/// Something that draws when asked.
pub trait Paintable: Send {
    /// Performs one paint. Returns `false` when the work was not completed
    /// (cancelled, stale) and should be retried right away.
    fn paint(&mut self) -> bool;
}

impl<F> Paintable for F
where
    F: FnMut() -> bool + Send,
{
    fn paint(&mut self) -> bool {
        self()
    }
}
