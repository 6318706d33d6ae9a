use std::fmt::Debug;
use std::time::Duration;

/// Decides where the next refinement chain starts.
///
/// Called after every successful pass with the level just rendered and how
/// long it took. Returns the new `max_index`, the coarsest level a fresh
/// repaint request starts from. Must stay within `0..num_scales`.
pub trait ScalePolicy: Debug + Send {
    fn next_max_index(
        &mut self,
        rendered: usize,
        render_time: Duration,
        max_index: usize,
        num_scales: usize,
    ) -> usize;
}

/// Hysteresis on a target render time.
///
/// Only the two most recently relevant levels move the threshold:
/// - the starting level itself took longer than the target → start one
///   level coarser,
/// - the level just below the start finished under the target → start one
///   level finer.
///
/// Any other level leaves it alone, so a single fast or slow frame far from
/// the start cannot make the starting point oscillate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HysteresisPolicy {
    pub target: Duration,
}

impl HysteresisPolicy {
    pub const fn new(target: Duration) -> Self {
        Self { target }
    }
}

impl ScalePolicy for HysteresisPolicy {
    fn next_max_index(
        &mut self,
        rendered: usize,
        render_time: Duration,
        max_index: usize,
        num_scales: usize,
    ) -> usize {
        if rendered == max_index {
            if render_time > self.target && max_index + 1 < num_scales {
                return max_index + 1;
            }
        } else if rendered + 1 == max_index && render_time < self.target {
            return max_index - 1;
        }
        max_index
    }
}

/// Always starts from the same level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStart(pub usize);

impl ScalePolicy for FixedStart {
    fn next_max_index(&mut self, _: usize, _: Duration, _: usize, num_scales: usize) -> usize {
        self.0.min(num_scales.saturating_sub(1))
    }
}
