use crate::source::RealValue;

use super::argb;
use super::lut::Lut;

/// Converts one source sample into a packed ARGB pixel.
///
/// Called concurrently from every kernel worker, hence `Send + Sync`.
/// Closures `Fn(&T) -> u32` implement it directly.
pub trait Converter<T>: Send + Sync {
    fn convert(&self, input: &T) -> u32;
}

impl<T, F> Converter<T> for F
where
    F: Fn(&T) -> u32 + Send + Sync,
{
    #[inline]
    fn convert(&self, input: &T) -> u32 {
        self(input)
    }
}

/// Linear `[min, max]` display window onto opaque gray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RealArgbConverter {
    pub min: f64,
    pub max: f64,
}

impl RealArgbConverter {
    #[inline]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Default for RealArgbConverter {
    fn default() -> Self {
        Self::new(0.0, 255.0)
    }
}

impl<T: RealValue> Converter<T> for RealArgbConverter {
    #[inline]
    fn convert(&self, input: &T) -> u32 {
        argb::gray(argb::window_to_u8(input.to_f64(), self.min, self.max))
    }
}

/// Linear `[min, max]` display window through a color lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct LutConverter {
    pub min: f64,
    pub max: f64,
    pub lut: Lut,
}

impl LutConverter {
    pub fn new(min: f64, max: f64, lut: Lut) -> Self {
        Self { min, max, lut }
    }
}

impl<T: RealValue> Converter<T> for LutConverter {
    #[inline]
    fn convert(&self, input: &T) -> u32 {
        self.lut
            .lookup(argb::window_to_u8(input.to_f64(), self.min, self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_converters() {
        let c = |v: &u32| *v | argb::BLACK;
        assert_eq!(Converter::convert(&c, &0x12), 0xff00_0012);
    }

    #[test]
    fn real_argb_maps_window_to_gray() {
        let c = RealArgbConverter::new(100.0, 200.0);
        assert_eq!(c.convert(&100u16), argb::BLACK);
        assert_eq!(c.convert(&200u16), 0xffff_ffff);
        assert_eq!(c.convert(&150.0f32), argb::gray(128));
    }

    #[test]
    fn lut_converter_goes_through_table() {
        let c = LutConverter::new(0.0, 255.0, Lut::fire());
        assert_eq!(c.convert(&85u8), argb::rgb(255, 0, 0));
    }
}
