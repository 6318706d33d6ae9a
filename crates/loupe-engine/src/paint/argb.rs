//! Packed `0xAARRGGBB` pixels, the output representation of every converter.

/// Opaque black.
pub const BLACK: u32 = 0xff00_0000;

/// Transparent black; the content of a freshly allocated screen image.
pub const TRANSPARENT: u32 = 0;

#[inline]
pub const fn pack(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    pack(0xff, r, g, b)
}

/// Opaque gray pixel.
#[inline]
pub const fn gray(v: u8) -> u32 {
    rgb(v, v, v)
}

#[inline]
pub const fn alpha(p: u32) -> u8 {
    (p >> 24) as u8
}

#[inline]
pub const fn red(p: u32) -> u8 {
    (p >> 16) as u8
}

#[inline]
pub const fn green(p: u32) -> u8 {
    (p >> 8) as u8
}

#[inline]
pub const fn blue(p: u32) -> u8 {
    p as u8
}

/// Unpacks into straight `[r, g, b, a]` bytes, the layout image encoders expect.
#[inline]
pub const fn to_rgba8(p: u32) -> [u8; 4] {
    [red(p), green(p), blue(p), alpha(p)]
}

/// Maps `v` linearly from `[min, max]` onto `0..=255`, clamping outside.
///
/// A degenerate window (`max <= min`) thresholds at `min`.
#[inline]
pub fn window_to_u8(v: f64, min: f64, max: f64) -> u8 {
    if !v.is_finite() {
        return 0;
    }
    let range = max - min;
    if range <= 0.0 {
        return if v >= min { 255 } else { 0 };
    }
    let t = ((v - min) / range * 255.0).round();
    t.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack_channels() {
        let p = pack(0x12, 0x34, 0x56, 0x78);
        assert_eq!(p, 0x1234_5678);
        assert_eq!((alpha(p), red(p), green(p), blue(p)), (0x12, 0x34, 0x56, 0x78));
        assert_eq!(to_rgba8(p), [0x34, 0x56, 0x78, 0x12]);
    }

    #[test]
    fn window_clamps_and_scales() {
        assert_eq!(window_to_u8(-5.0, 0.0, 10.0), 0);
        assert_eq!(window_to_u8(5.0, 0.0, 10.0), 128);
        assert_eq!(window_to_u8(10.0, 0.0, 10.0), 255);
        assert_eq!(window_to_u8(99.0, 0.0, 10.0), 255);
    }

    #[test]
    fn window_handles_degenerate_range_and_nan() {
        assert_eq!(window_to_u8(3.0, 3.0, 3.0), 255);
        assert_eq!(window_to_u8(2.0, 3.0, 3.0), 0);
        assert_eq!(window_to_u8(f64::NAN, 0.0, 1.0), 0);
    }
}
