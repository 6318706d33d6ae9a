use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use rayon::ThreadPool;

use crate::coords::AffineTransform;
use crate::error::RenderError;
use crate::paint::Converter;
use crate::source::RealSampler;
use crate::time::StopWatch;

use super::cancel::CancelToken;
use super::image::ScreenImage;

/// Upper bound on a single pass before it is abandoned.
pub const DEFAULT_PASS_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Fills one [`ScreenImage`] from a transformed source, in parallel, abortable.
///
/// Screen pixel `(x, y)` reads the source at `screen_to_source * (x, y, 0, ..)`;
/// source axes beyond the transform's dimensionality stay at 0.
///
/// Rows are split into independent bands, one rayon task each. Every worker
/// polls the cancellation token (and the pass deadline) once per row, so the
/// cancellation latency is bounded by the time to fill one row. A cancelled
/// pass leaves the rest of the buffer untouched; callers discard it and build
/// a fresh projector for the next attempt.
pub struct InterruptibleProjector<'s, A, S, C> {
    sampler: &'s S,
    converter: &'s C,
    screen_to_source: A,
    cancel: CancelToken,
    timeout: Duration,
    last_render_time: Option<Duration>,
}

enum BandEnd {
    Done,
    Cancelled,
    TimedOut,
}

impl<'s, A, S, C> InterruptibleProjector<'s, A, S, C>
where
    A: AffineTransform,
    S: RealSampler,
    C: Converter<S::Value>,
{
    pub fn new(sampler: &'s S, converter: &'s C, screen_to_source: A, cancel: CancelToken) -> Self {
        Self {
            sampler,
            converter,
            screen_to_source,
            cancel,
            timeout: DEFAULT_PASS_TIMEOUT,
            last_render_time: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Aborts a running [`map`](Self::map). No effect once it has returned.
    #[inline]
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[inline]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Wall-clock time of the last `map` call, whatever its outcome.
    #[inline]
    pub fn last_render_time(&self) -> Option<Duration> {
        self.last_render_time
    }

    /// Renders into `target` using the workers of `pool`.
    ///
    /// Returns `Ok(true)` when every pixel was written, `Ok(false)` when the
    /// pass was cancelled. A panicking sampler or converter, or an expired
    /// deadline, cancels the remaining bands and yields an error.
    pub fn map(
        &mut self,
        target: &mut ScreenImage,
        pool: &ThreadPool,
    ) -> Result<bool, RenderError> {
        let watch = StopWatch::started();
        let result = self.fill(target, pool);
        self.last_render_time = Some(watch.elapsed());
        result
    }

    fn fill(&self, target: &mut ScreenImage, pool: &ThreadPool) -> Result<bool, RenderError> {
        let width = target.width() as usize;
        let height = target.height() as usize;
        if width == 0 || height == 0 {
            return Ok(!self.cancel.is_cancelled());
        }

        let now = Instant::now();
        let deadline = now.checked_add(self.timeout).unwrap_or(now + DEFAULT_PASS_TIMEOUT);
        let num_bands = band_count(pool.current_num_threads(), height);
        let bands = split_bands(target.pixels_mut(), width, height, num_bands);
        let fault: Mutex<Option<RenderError>> = Mutex::new(None);

        pool.scope(|scope| {
            for (y0, rows) in bands {
                let fault = &fault;
                scope.spawn(move |_| {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        self.fill_band(y0, width, rows, deadline)
                    }));
                    let err = match outcome {
                        Ok(BandEnd::Done | BandEnd::Cancelled) => return,
                        Ok(BandEnd::TimedOut) => RenderError::TimedOut(self.timeout),
                        Err(payload) => RenderError::from_panic(payload.as_ref()),
                    };
                    self.cancel.cancel();
                    fault
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .get_or_insert(err);
                });
            }
        });

        if let Some(err) = fault.into_inner().unwrap_or_else(PoisonError::into_inner) {
            return Err(err);
        }
        Ok(!self.cancel.is_cancelled())
    }

    fn fill_band(&self, y0: usize, width: usize, rows: &mut [u32], deadline: Instant) -> BandEnd {
        let n = A::DIMENSIONS.max(self.sampler.num_dimensions());
        let mut screen = vec![0.0; n];
        let mut origin = vec![0.0; n];
        let mut step = vec![0.0; n];
        let mut row_start = vec![0.0; n];
        let mut pos = vec![0.0; n];

        // Source-space increment of one screen pixel along x.
        self.screen_to_source.apply(&screen, &mut origin);
        screen[0] = 1.0;
        self.screen_to_source.apply(&screen, &mut step);
        screen[0] = 0.0;
        for (s, o) in step.iter_mut().zip(origin.iter()) {
            *s -= o;
        }

        for (r, row) in rows.chunks_mut(width).enumerate() {
            if self.cancel.is_cancelled() {
                return BandEnd::Cancelled;
            }
            if Instant::now() >= deadline {
                return BandEnd::TimedOut;
            }

            screen[1] = (y0 + r) as f64;
            self.screen_to_source.apply(&screen, &mut row_start);

            for (x, px) in row.iter_mut().enumerate() {
                let xf = x as f64;
                for ((p, &s0), &dx) in pos.iter_mut().zip(row_start.iter()).zip(step.iter()) {
                    *p = s0 + xf * dx;
                }
                *px = self.converter.convert(&self.sampler.sample(&pos));
            }
        }
        BandEnd::Done
    }
}

/// `max(P * 10, H)` bands for a multi-threaded pool, a single band otherwise.
#[inline]
fn band_count(num_threads: usize, height: usize) -> usize {
    if num_threads > 1 {
        (num_threads * 10).max(height)
    } else {
        1
    }
}

/// Splits `pixels` into `num_bands` disjoint row bands, tagged with their first
/// row. Empty bands (more bands than rows) are dropped.
fn split_bands(
    pixels: &mut [u32],
    width: usize,
    height: usize,
    num_bands: usize,
) -> Vec<(usize, &mut [u32])> {
    let mut bands = Vec::with_capacity(num_bands.min(height));
    let mut rest = pixels;
    let mut y = 0;
    for t in 0..num_bands {
        let end = if t + 1 == num_bands {
            height
        } else {
            (t + 1) * height / num_bands
        };
        let (band, tail) = std::mem::take(&mut rest).split_at_mut((end - y) * width);
        if !band.is_empty() {
            bands.push((y, band));
        }
        rest = tail;
        y = end;
    }
    bands
}
