use std::time::{Duration, Instant};

/// Accumulating wall-clock timer.
///
/// A stopped watch reports a frozen `elapsed()`; a running one advances
/// monotonically. Repeated `start()`/`stop()` cycles accumulate.
#[derive(Debug, Clone, Default)]
pub struct StopWatch {
    accumulated: Duration,
    started: Option<Instant>,
}

impl StopWatch {
    /// Creates a stopped watch with zero elapsed time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a watch that is already running.
    pub fn started() -> Self {
        let mut watch = Self::new();
        watch.start();
        watch
    }

    /// Starts (or resumes) the watch. No-op while already running.
    pub fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    /// Stops the watch and folds the running interval into the total.
    pub fn stop(&mut self) {
        if let Some(t0) = self.started.take() {
            self.accumulated += t0.elapsed();
        }
    }

    /// Resets to zero and stops.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started = None;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Total time spent running.
    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(t0) => self.accumulated + t0.elapsed(),
            None => self.accumulated,
        }
    }

    #[inline]
    pub fn nanos(&self) -> u128 {
        self.elapsed().as_nanos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_watch_is_frozen_at_zero() {
        let w = StopWatch::new();
        assert_eq!(w.elapsed(), Duration::ZERO);
        assert_eq!(w.elapsed(), w.elapsed());
        assert!(!w.is_running());
    }

    #[test]
    fn running_watch_is_monotonic_and_stopped_watch_is_frozen() {
        let mut w = StopWatch::new();
        let t1 = w.elapsed();
        w.start();
        let t2 = w.elapsed();
        let t3 = w.elapsed();
        w.stop();
        let t4 = w.elapsed();
        let t5 = w.elapsed();
        w.start();
        let t6 = w.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        w.stop();
        let t7 = w.elapsed();
        let t8 = w.elapsed();

        assert!(t2 >= t1);
        assert!(t3 >= t2);
        assert!(t4 >= t3);
        assert_eq!(t4, t5);
        assert!(t6 >= t5);
        assert!(t7 >= t6 + Duration::from_millis(2));
        assert_eq!(t7, t8);
    }

    #[test]
    fn start_twice_does_not_restart_interval() {
        let mut w = StopWatch::started();
        std::thread::sleep(Duration::from_millis(2));
        w.start();
        w.stop();
        assert!(w.elapsed() >= Duration::from_millis(2));
    }

    #[test]
    fn reset_clears_total() {
        let mut w = StopWatch::started();
        std::thread::sleep(Duration::from_millis(1));
        w.reset();
        assert_eq!(w.elapsed(), Duration::ZERO);
        assert!(!w.is_running());
    }
}
