use std::sync::{Mutex, MutexGuard, PoisonError};

use super::cancel::CancelToken;

/// What the next pass should render, and the handle to stop the current one.
///
/// One mutex guards the requested scale, the adaptive starting level, and
/// the in-flight pass's token. Every method is a single critical section, so
/// a request either lands before a pass snapshots it or cancels that pass.
#[derive(Debug)]
pub(crate) struct RenderRequest {
    state: Mutex<RequestState>,
}

#[derive(Debug)]
struct RequestState {
    num_scales: usize,
    requested: usize,
    max_index: usize,
    /// Whether the in-flight pass may be cancelled by a newer request.
    cancellable: bool,
    active: Option<CancelToken>,
    /// Bumped on every request; lets a finished pass tell whether a newer
    /// request arrived while it was running.
    generation: u64,
}

/// Snapshot taken at the start of a pass.
#[derive(Debug, Clone)]
pub(crate) struct PassTicket {
    pub index: usize,
    pub cancellable: bool,
    pub token: CancelToken,
    generation: u64,
}

impl RenderRequest {
    /// Starts at the coarsest level, with a repaint implicitly requested there.
    pub fn new(num_scales: usize) -> Self {
        let coarsest = num_scales.saturating_sub(1);
        Self {
            state: Mutex::new(RequestState {
                num_scales,
                requested: coarsest,
                max_index: coarsest,
                cancellable: true,
                active: None,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RequestState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Requests a pass at `index` (`None`: the current starting level).
    ///
    /// Cancels the in-flight pass if it may be cancelled. Returns the index
    /// actually requested after clamping.
    pub fn request(&self, index: Option<usize>) -> usize {
        let mut st = self.lock();
        let index = index
            .unwrap_or(st.max_index)
            .min(st.num_scales.saturating_sub(1));
        if st.cancellable {
            if let Some(token) = &st.active {
                token.cancel();
            }
        }
        st.requested = index;
        st.generation = st.generation.wrapping_add(1);
        index
    }

    /// Snapshots the requested index and installs a fresh token for the pass.
    ///
    /// Passes below the starting level are refinements and may be cancelled;
    /// the starting level itself always runs to completion so something is
    /// shown even under continuous input.
    pub fn begin_pass(&self) -> PassTicket {
        let mut st = self.lock();
        let index = st.requested;
        let cancellable = index < st.max_index;
        let token = CancelToken::new();
        st.cancellable = cancellable;
        st.active = Some(token.clone());
        PassTicket {
            index,
            cancellable,
            token,
            generation: st.generation,
        }
    }

    /// Clears the in-flight token once the kernel has returned.
    pub fn finish_pass(&self) {
        let mut st = self.lock();
        st.active = None;
        st.cancellable = true;
    }

    /// Requests the next finer level, unless a newer request superseded the
    /// pass described by `ticket`. Returns whether the request was made.
    pub fn refine(&self, ticket: &PassTicket, next: usize) -> bool {
        let mut st = self.lock();
        if st.generation != ticket.generation {
            return false;
        }
        st.requested = next.min(st.num_scales.saturating_sub(1));
        st.generation = st.generation.wrapping_add(1);
        true
    }

    /// Cancels the in-flight pass regardless of its level.
    pub fn cancel_active(&self) {
        if let Some(token) = &self.lock().active {
            token.cancel();
        }
    }

    pub fn max_index(&self) -> usize {
        self.lock().max_index
    }

    pub fn set_max_index(&self, max_index: usize) {
        let mut st = self.lock();
        st.max_index = max_index.min(st.num_scales.saturating_sub(1));
    }

    pub fn requested_index(&self) -> usize {
        self.lock().requested
    }
}
