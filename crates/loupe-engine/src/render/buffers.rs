use std::sync::Arc;

use crate::coords::{AffineTransform, CanvasSize};

use super::image::ScreenImage;

/// Front/back rotation of the screen images of one scale.
///
/// The back handle is the next render target. It is only written through
/// when uniquely owned; if a sink still holds it, a fresh image takes its
/// place, so a published image is never mutated. With one slot (double
/// buffering off) the same rule applies to the single handle.
#[derive(Debug)]
pub(crate) struct DoubleBuffer {
    size: CanvasSize,
    slots: Vec<Arc<ScreenImage>>,
    back: usize,
}

impl DoubleBuffer {
    pub fn new(size: CanvasSize, double_buffered: bool) -> Self {
        let n = if double_buffered { 2 } else { 1 };
        Self {
            size,
            slots: (0..n).map(|_| Arc::new(ScreenImage::new(size))).collect(),
            back: 0,
        }
    }

    #[inline]
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// The image the next pass renders into.
    pub fn back_mut(&mut self) -> &mut ScreenImage {
        let size = self.size;
        let slot = &mut self.slots[self.back];
        if Arc::get_mut(slot).is_none() {
            log::trace!(
                "back buffer {}x{} still shared; allocating a fresh one",
                size.width,
                size.height
            );
            *slot = Arc::new(ScreenImage::new(size));
        }
        // Unique at this point, so this never clones.
        Arc::make_mut(slot)
    }

    /// Hands out the just-rendered back image and rotates.
    pub fn publish(&mut self) -> Arc<ScreenImage> {
        let image = Arc::clone(&self.slots[self.back]);
        self.back = (self.back + 1) % self.slots.len();
        image
    }
}

/// Per-scale state: buffer pair plus the canvas-to-buffer transform.
#[derive(Debug)]
pub(crate) struct ScaleLevel<A> {
    pub transform: A,
    pub buffers: DoubleBuffer,
}

impl<A: AffineTransform> ScaleLevel<A> {
    /// Sizes the buffers to `scale * canvas` and maps canvas pixel centers
    /// onto buffer pixel centers.
    pub fn new(canvas: CanvasSize, scale: f64, double_buffered: bool) -> Self {
        let size = canvas.scaled(scale);
        let sx = size.width as f64 / canvas.width as f64;
        let sy = size.height as f64 / canvas.height as f64;
        let transform = A::screen_scale(sx, sy, 0.5 * sx - 0.5, 0.5 * sy - 0.5);
        Self {
            transform,
            buffers: DoubleBuffer::new(size, double_buffered),
        }
    }
}
