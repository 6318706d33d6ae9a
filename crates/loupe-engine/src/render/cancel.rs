use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag for cooperative cancellation of one render pass.
///
/// Clones observe the same flag. Once set it stays set; every pass gets a
/// fresh token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
