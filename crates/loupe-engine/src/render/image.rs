use crate::coords::CanvasSize;
use crate::paint::argb;

/// ARGB pixel buffer one render pass writes into.
///
/// Row-major, no padding: pixel `(x, y)` lives at `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenImage {
    size: CanvasSize,
    pixels: Vec<u32>,
}

impl ScreenImage {
    /// Allocates a transparent image.
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            pixels: vec![argb::TRANSPARENT; size.pixel_count()],
        }
    }

    #[inline]
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(self.pixels[y as usize * self.size.width as usize + x as usize])
    }

    pub fn fill(&mut self, pixel: u32) {
        self.pixels.fill(pixel);
    }

    /// Raw native-endian bytes, for uploading to a texture or blitting.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Straight RGBA8 copy, the layout image encoders expect.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&p| argb::to_rgba8(p)).collect()
    }
}
