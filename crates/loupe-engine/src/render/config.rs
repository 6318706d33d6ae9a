use std::time::Duration;

use crate::error::RenderError;

use super::projector::DEFAULT_PASS_TIMEOUT;
use super::scales::ScreenScales;

/// Construction-time configuration of a [`MultiResolutionRenderer`].
///
/// [`MultiResolutionRenderer`]: super::MultiResolutionRenderer
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Screen scales, finest first.
    pub screen_scales: ScreenScales,
    /// Per-frame budget the adaptive policy steers the coarsest level toward.
    pub target_render_time: Duration,
    /// Two buffers per scale instead of one.
    pub double_buffered: bool,
    /// Worker threads of the kernel's pool.
    pub num_threads: usize,
    /// Deadline after which a single pass is abandoned.
    pub pass_timeout: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            screen_scales: ScreenScales::default(),
            target_render_time: Duration::from_millis(30),
            double_buffered: true,
            num_threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            pass_timeout: DEFAULT_PASS_TIMEOUT,
        }
    }
}

impl RendererConfig {
    pub fn with_screen_scales(mut self, scales: ScreenScales) -> Self {
        self.screen_scales = scales;
        self
    }

    pub fn with_target_render_time(mut self, target: Duration) -> Self {
        self.target_render_time = target;
        self
    }

    pub fn with_double_buffered(mut self, on: bool) -> Self {
        self.double_buffered = on;
        self
    }

    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = n;
        self
    }

    pub fn with_pass_timeout(mut self, timeout: Duration) -> Self {
        self.pass_timeout = timeout;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), RenderError> {
        if self.num_threads == 0 {
            return Err(RenderError::InvalidConfig("num_threads must be at least 1".into()));
        }
        Ok(())
    }
}
