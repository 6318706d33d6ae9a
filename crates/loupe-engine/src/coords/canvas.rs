/// Canvas size in physical pixels.
///
/// Every screen-scale buffer is derived from this; a change in canvas size
/// invalidates all of them.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size of a buffer rendered at `scale` (rounded, at least 1x1 for a
    /// non-empty canvas).
    pub fn scaled(self, scale: f64) -> CanvasSize {
        if self.is_empty() {
            return CanvasSize::default();
        }
        let w = (scale * self.width as f64).round().max(1.0) as u32;
        let h = (scale * self.height as f64).round().max(1.0) as u32;
        CanvasSize::new(w, h)
    }

    #[inline]
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_rounds_to_nearest() {
        assert_eq!(CanvasSize::new(801, 600).scaled(0.5), CanvasSize::new(401, 300));
        assert_eq!(CanvasSize::new(10, 10).scaled(0.25), CanvasSize::new(3, 3));
    }

    #[test]
    fn scaled_never_collapses_to_zero() {
        assert_eq!(CanvasSize::new(3, 1).scaled(0.1), CanvasSize::new(1, 1));
    }

    #[test]
    fn empty_canvas_stays_empty() {
        assert!(CanvasSize::new(0, 50).scaled(1.0).is_empty());
    }
}
