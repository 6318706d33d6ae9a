use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// What the painter is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PainterState {
    Idle,
    PendingRepaint,
    Painting,
    Stopped,
}

/// Wake-up channel between repaint requesters and the painter thread.
///
/// Cheap to clone; all clones share one pending flag, so any number of
/// requests before the painter wakes up cost a single paint.
#[derive(Debug, Clone, Default)]
pub struct RepaintSignal {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    flags: Mutex<Flags>,
    wake: Condvar,
}

#[derive(Debug, Default)]
struct Flags {
    pending: bool,
    painting: bool,
    stopped: bool,
    exited: bool,
}

impl RepaintSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Flags> {
        self.shared.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a repaint pending and wakes the painter. Never blocks on a paint.
    pub fn request_repaint(&self) {
        let mut flags = self.lock();
        if flags.stopped {
            return;
        }
        if flags.pending {
            log::trace!("repaint request coalesced");
            return;
        }
        flags.pending = true;
        drop(flags);
        self.shared.wake.notify_all();
    }

    pub fn state(&self) -> PainterState {
        let flags = self.lock();
        if flags.stopped {
            PainterState::Stopped
        } else if flags.painting {
            PainterState::Painting
        } else if flags.pending {
            PainterState::PendingRepaint
        } else {
            PainterState::Idle
        }
    }

    /// Clears the pending flag, returning whether it was set.
    ///
    /// Lets in-crate tests drive paints by hand without a painter thread.
    pub(crate) fn take_pending(&self) -> bool {
        std::mem::take(&mut self.lock().pending)
    }

    /// Stops the painter. Later requests are ignored.
    pub fn stop(&self) {
        let mut flags = self.lock();
        flags.stopped = true;
        flags.pending = false;
        drop(flags);
        self.shared.wake.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Sleeps until a repaint is pending, then claims it. Returns `false`
    /// once stopped.
    pub(crate) fn wait_for_work(&self) -> bool {
        let mut flags = self.lock();
        loop {
            if flags.stopped {
                return false;
            }
            if flags.pending {
                flags.pending = false;
                flags.painting = true;
                return true;
            }
            flags = self
                .shared
                .wake
                .wait(flags)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Records that the painter loop has returned.
    pub(crate) fn mark_exited(&self) {
        self.lock().exited = true;
        self.shared.wake.notify_all();
    }

    /// Waits up to `timeout` for the painter loop to return.
    pub(crate) fn wait_exited(&self, timeout: Duration) -> bool {
        // An unrepresentable deadline means waiting without one.
        let deadline = Instant::now().checked_add(timeout);
        let mut flags = self.lock();
        while !flags.exited {
            let wake = &self.shared.wake;
            flags = match deadline {
                None => wake.wait(flags).unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    wake.wait_timeout(flags, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
        true
    }

    /// Ends a paint claimed by `wait_for_work`; an incomplete one is queued
    /// again.
    pub(crate) fn finish_paint(&self, completed: bool) {
        let mut flags = self.lock();
        flags.painting = false;
        if !completed && !flags.stopped {
            flags.pending = true;
        }
        drop(flags);
        self.shared.wake.notify_all();
    }
}
