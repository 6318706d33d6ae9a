use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;

use crate::error::panic_message;

use super::{Paintable, RepaintSignal};

/// Dedicated thread calling [`Paintable::paint`] on demand.
///
/// Paints never overlap: the paintable is owned by the thread and only ever
/// called from its loop. Stopping (or dropping) the painter waits for the
/// current paint to return, for at most the stop timeout when one is set.
/// A paint still running past it is left to finish on a detached thread.
#[derive(Debug)]
pub struct PainterThread {
    signal: RepaintSignal,
    handle: Option<JoinHandle<()>>,
    stop_timeout: Option<Duration>,
}

impl PainterThread {
    /// Spawns the painter. No paint happens until a repaint is requested.
    pub fn spawn<P>(
        name: impl Into<String>,
        signal: RepaintSignal,
        paintable: P,
    ) -> anyhow::Result<Self>
    where
        P: Paintable + 'static,
    {
        let name = name.into();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn({
                let signal = signal.clone();
                move || run(signal, paintable)
            })
            .with_context(|| format!("failed to spawn painter thread `{name}`"))?;
        Ok(Self { signal, handle: Some(handle), stop_timeout: None })
    }

    /// Bounds how long [`stop`](Self::stop) and [`join`](Self::join) wait.
    #[must_use]
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = Some(timeout);
        self
    }

    #[inline]
    pub fn request_repaint(&self) {
        self.signal.request_repaint();
    }

    #[inline]
    pub fn signal(&self) -> &RepaintSignal {
        &self.signal
    }

    /// Ends the loop and waits for the thread. Safe to call repeatedly.
    ///
    /// Returns `false` when the thread was detached instead of joined.
    pub fn stop(&mut self) -> bool {
        self.signal.stop();
        self.join()
    }

    /// Waits for the thread to exit without asking it to.
    pub fn join(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return true;
        };
        if handle.thread().id() == thread::current().id() {
            // Stopped from inside paint(); the loop exits after it returns.
            return true;
        }
        if let Some(timeout) = self.stop_timeout {
            if !self.signal.wait_exited(timeout) {
                log::warn!("painter thread still busy after {timeout:?}; detaching it");
                return false;
            }
        }
        if handle.join().is_err() {
            log::error!("painter thread terminated abnormally");
        }
        true
    }
}

impl Drop for PainterThread {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Marks the loop as gone even when it unwinds.
struct ExitGuard<'a>(&'a RepaintSignal);

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        self.0.mark_exited();
    }
}

fn run<P: Paintable>(signal: RepaintSignal, mut paintable: P) {
    let _exit = ExitGuard(&signal);
    log::debug!("painter thread started");
    while signal.wait_for_work() {
        let completed = match panic::catch_unwind(AssertUnwindSafe(|| paintable.paint())) {
            Ok(completed) => completed,
            Err(payload) => {
                log::error!("paint panicked: {}", panic_message(payload.as_ref()));
                true
            }
        };
        signal.finish_paint(completed);
    }
    log::debug!("painter thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::PainterState;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        cond()
    }

    fn settle(signal: &RepaintSignal) {
        assert!(wait_until(Duration::from_secs(10), || signal.state() == PainterState::Idle));
    }

    // ── scheduling ────────────────────────────────────────────────────────

    #[test]
    fn paints_never_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let paints = Arc::new(AtomicUsize::new(0));
        let signal = RepaintSignal::new();
        let mut painter = {
            let (in_flight, max_seen, paints) =
                (in_flight.clone(), max_seen.clone(), paints.clone());
            PainterThread::spawn("test-painter", signal.clone(), move || {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_micros(200));
                in_flight.fetch_sub(1, Ordering::SeqCst);
                paints.fetch_add(1, Ordering::SeqCst);
                true
            })
            .unwrap()
        };

        let requesters: Vec<_> = (0..4)
            .map(|_| {
                let signal = signal.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        signal.request_repaint();
                        thread::yield_now();
                    }
                })
            })
            .collect();
        for r in requesters {
            r.join().unwrap();
        }
        settle(&signal);
        painter.stop();

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(paints.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn requests_during_a_paint_coalesce_into_one() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let paints = Arc::new(AtomicUsize::new(0));
        let signal = RepaintSignal::new();
        let mut painter = {
            let paints = paints.clone();
            PainterThread::spawn("test-painter", signal.clone(), move || {
                if paints.fetch_add(1, Ordering::SeqCst) == 0 {
                    started_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                }
                true
            })
            .unwrap()
        };

        signal.request_repaint();
        started_rx.recv_timeout(Duration::from_secs(10)).unwrap();
        for _ in 0..100 {
            signal.request_repaint();
        }
        release_tx.send(()).unwrap();
        settle(&signal);
        thread::sleep(Duration::from_millis(20));
        painter.stop();

        assert_eq!(paints.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn incomplete_paint_is_retried() {
        let paints = Arc::new(AtomicUsize::new(0));
        let signal = RepaintSignal::new();
        let mut painter = {
            let paints = paints.clone();
            PainterThread::spawn("test-painter", signal.clone(), move || {
                paints.fetch_add(1, Ordering::SeqCst) >= 2
            })
            .unwrap()
        };
        signal.request_repaint();
        settle(&signal);
        painter.stop();
        assert_eq!(paints.load(Ordering::SeqCst), 3);
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn survives_a_panicking_paint() {
        let paints = Arc::new(AtomicUsize::new(0));
        let signal = RepaintSignal::new();
        let mut painter = {
            let paints = paints.clone();
            PainterThread::spawn("test-painter", signal.clone(), move || {
                if paints.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("first paint explodes");
                }
                true
            })
            .unwrap()
        };
        signal.request_repaint();
        settle(&signal);
        signal.request_repaint();
        assert!(wait_until(Duration::from_secs(10), || paints.load(Ordering::SeqCst) == 2));
        painter.stop();
    }

    #[test]
    fn stop_waits_for_the_running_paint() {
        let finished = Arc::new(AtomicBool::new(false));
        let (started_tx, started_rx) = mpsc::channel();
        let signal = RepaintSignal::new();
        let mut painter = {
            let finished = finished.clone();
            PainterThread::spawn("test-painter", signal.clone(), move || {
                let _ = started_tx.send(());
                thread::sleep(Duration::from_millis(30));
                finished.store(true, Ordering::SeqCst);
                true
            })
            .unwrap()
        };
        signal.request_repaint();
        started_rx.recv_timeout(Duration::from_secs(10)).unwrap();
        painter.stop();
        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(signal.state(), PainterState::Stopped);
        painter.stop();
    }

    #[test]
    fn stop_gives_up_on_a_stuck_paint() {
        let (started_tx, started_rx) = mpsc::channel();
        let signal = RepaintSignal::new();
        let mut painter = PainterThread::spawn("test-painter", signal.clone(), move || {
            let _ = started_tx.send(());
            thread::sleep(Duration::from_secs(2));
            true
        })
        .unwrap()
        .with_stop_timeout(Duration::from_millis(50));
        signal.request_repaint();
        started_rx.recv_timeout(Duration::from_secs(10)).unwrap();

        let watch = Instant::now();
        assert!(!painter.stop());
        assert!(watch.elapsed() < Duration::from_secs(1));
        assert!(signal.is_stopped());
        // Already detached; a second stop has nothing left to wait for.
        assert!(painter.stop());
    }

    #[test]
    fn stop_timeout_still_joins_a_quick_paint() {
        let signal = RepaintSignal::new();
        let mut painter = PainterThread::spawn("test-painter", signal.clone(), || true)
            .unwrap()
            .with_stop_timeout(Duration::from_secs(10));
        signal.request_repaint();
        settle(&signal);
        assert!(painter.stop());
    }

    #[test]
    fn drop_stops_the_thread() {
        let signal = RepaintSignal::new();
        let painter = PainterThread::spawn("test-painter", signal.clone(), || true).unwrap();
        drop(painter);
        assert!(signal.is_stopped());
    }
}
