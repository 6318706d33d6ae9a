use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::coords::CanvasSize;

use super::image::ScreenImage;

/// Where finished passes go.
///
/// `set_image` is called from the painter thread with an image the renderer
/// will not write again while the handle is shared. Implementations must not
/// block for long; the next refinement pass waits on it.
pub trait RenderTarget: Send + Sync {
    fn set_image(&self, image: Arc<ScreenImage>);

    /// Current canvas width in pixels.
    fn width(&self) -> u32;

    /// Current canvas height in pixels.
    fn height(&self) -> u32;

    fn canvas_size(&self) -> CanvasSize {
        CanvasSize::new(self.width(), self.height())
    }
}

/// Keeps the most recently published image for a display thread to pick up.
///
/// Holds the canvas size the renderer sizes its buffers from, and lets
/// readers block until an image they care about shows up.
#[derive(Debug)]
pub struct BufferedImageTarget {
    // width in the high half, height in the low half
    size: AtomicU64,
    latest: Mutex<Latest>,
    published: Condvar,
}

#[derive(Debug, Default)]
struct Latest {
    image: Option<Arc<ScreenImage>>,
    count: u64,
}

#[inline]
fn pack(size: CanvasSize) -> u64 {
    (u64::from(size.width) << 32) | u64::from(size.height)
}

#[inline]
fn unpack(bits: u64) -> CanvasSize {
    CanvasSize::new((bits >> 32) as u32, bits as u32)
}

impl BufferedImageTarget {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size: AtomicU64::new(pack(size)),
            latest: Mutex::new(Latest::default()),
            published: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Latest> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes the canvas size; the renderer picks it up on its next pass.
    pub fn set_canvas_size(&self, size: CanvasSize) {
        self.size.store(pack(size), Ordering::Release);
    }

    /// Latest published image, if any.
    pub fn image(&self) -> Option<Arc<ScreenImage>> {
        self.lock().image.clone()
    }

    /// Number of images published so far.
    pub fn published_count(&self) -> u64 {
        self.lock().count
    }

    /// Blocks until the latest image satisfies `pred` or `timeout` elapses.
    pub fn wait_for<F>(&self, timeout: Duration, mut pred: F) -> Option<Arc<ScreenImage>>
    where
        F: FnMut(&ScreenImage) -> bool,
    {
        let deadline = Instant::now() + timeout;
        let mut latest = self.lock();
        loop {
            if let Some(image) = &latest.image {
                if pred(image) {
                    return Some(Arc::clone(image));
                }
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            latest = self
                .published
                .wait_timeout(latest, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

impl RenderTarget for BufferedImageTarget {
    fn set_image(&self, image: Arc<ScreenImage>) {
        let mut latest = self.lock();
        latest.image = Some(image);
        latest.count += 1;
        drop(latest);
        self.published.notify_all();
    }

    fn width(&self) -> u32 {
        unpack(self.size.load(Ordering::Acquire)).width
    }

    fn height(&self) -> u32 {
        unpack(self.size.load(Ordering::Acquire)).height
    }

    fn canvas_size(&self) -> CanvasSize {
        unpack(self.size.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn size_round_trips_through_the_atomic() {
        let t = BufferedImageTarget::new(CanvasSize::new(640, 480));
        assert_eq!((t.width(), t.height()), (640, 480));
        t.set_canvas_size(CanvasSize::new(u32::MAX, 1));
        assert_eq!(t.canvas_size(), CanvasSize::new(u32::MAX, 1));
    }

    #[test]
    fn keeps_latest_and_counts() {
        let t = BufferedImageTarget::new(CanvasSize::new(2, 2));
        assert!(t.image().is_none());
        t.set_image(Arc::new(ScreenImage::new(CanvasSize::new(1, 1))));
        t.set_image(Arc::new(ScreenImage::new(CanvasSize::new(2, 2))));
        assert_eq!(t.published_count(), 2);
        assert_eq!(t.image().map(|i| i.width()), Some(2));
    }

    #[test]
    fn wait_for_wakes_on_matching_publication() {
        let t = Arc::new(BufferedImageTarget::new(CanvasSize::new(4, 4)));
        let publisher = {
            let t = Arc::clone(&t);
            thread::spawn(move || {
                for w in 1..=4 {
                    thread::sleep(Duration::from_millis(5));
                    t.set_image(Arc::new(ScreenImage::new(CanvasSize::new(w, 4))));
                }
            })
        };
        let got = t.wait_for(Duration::from_secs(10), |i| i.width() == 4);
        publisher.join().unwrap();
        assert_eq!(got.map(|i| i.width()), Some(4));
    }

    #[test]
    fn wait_for_times_out() {
        let t = BufferedImageTarget::new(CanvasSize::new(4, 4));
        let start = Instant::now();
        assert!(t.wait_for(Duration::from_millis(20), |_| true).is_none());
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
