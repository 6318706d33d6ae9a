use super::matrix;
use super::transform::AffineTransform;

/// 2D affine transform, row-major `2 x 3`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    m: [f64; 6],
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine2 {
    /// Creates a transform from its row-major entries.
    #[inline]
    pub const fn new(m00: f64, m01: f64, m02: f64, m10: f64, m11: f64, m12: f64) -> Self {
        Self { m: [m00, m01, m02, m10, m11, m12] }
    }

    #[inline]
    pub fn from_translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, dx, 0.0, 1.0, dy)
    }

    #[inline]
    pub fn from_rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, -s, 0.0, s, c, 0.0)
    }

    /// Entry at `(row, col)`; `col == 2` is the translation column.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row * 3 + col]
    }

    #[inline]
    pub fn set_entry(&mut self, row: usize, col: usize, value: f64) {
        self.m[row * 3 + col] = value;
    }

    /// Shifts the output space by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.m[2] += dx;
        self.m[5] += dy;
        self
    }

    /// Rotates the output space by `angle` radians around the origin.
    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        self.preconcatenate(&Self::from_rotation(angle))
    }

    /// Rotates the output space by `angle` radians around `(cx, cy)`.
    pub fn rotate_about(&mut self, angle: f64, cx: f64, cy: f64) -> &mut Self {
        self.translate(-cx, -cy).rotate(angle).translate(cx, cy)
    }

    /// Maps a single point.
    #[inline]
    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        let mut out = [0.0; 2];
        self.apply(&[x, y], &mut out);
        (out[0], out[1])
    }
}

impl AffineTransform for Affine2 {
    const DIMENSIONS: usize = 2;

    #[inline]
    fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    #[inline]
    fn screen_scale(sx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self::new(sx, 0.0, tx, 0.0, sy, ty)
    }

    fn concatenate(&mut self, other: &Self) -> &mut Self {
        let mut out = [0.0; 6];
        matrix::multiply(2, &self.m, &other.m, &mut out);
        self.m = out;
        self
    }

    fn preconcatenate(&mut self, other: &Self) -> &mut Self {
        let mut out = [0.0; 6];
        matrix::multiply(2, &other.m, &self.m, &mut out);
        self.m = out;
        self
    }

    fn inverse(&self) -> Option<Self> {
        let mut out = [0.0; 6];
        matrix::invert(2, &self.m, &mut out).then_some(Self { m: out })
    }

    #[inline]
    fn apply(&self, source: &[f64], target: &mut [f64]) {
        matrix::apply(2, &self.m, source, target);
    }

    #[inline]
    fn translation(&self, d: usize) -> f64 {
        self.get(d, 2)
    }

    #[inline]
    fn set_translation(&mut self, d: usize, value: f64) {
        self.set_entry(d, 2, value);
    }

    fn scale(&mut self, s: f64) -> &mut Self {
        for v in &mut self.m {
            *v *= s;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn concatenate_applies_argument_first() {
        let mut t = Affine2::from_translation(10.0, 0.0);
        t.concatenate(&Affine2::screen_scale(2.0, 2.0, 0.0, 0.0));
        // scale first, then translate
        assert!(close(t.apply_point(1.0, 1.0), (12.0, 2.0)));
    }

    #[test]
    fn preconcatenate_applies_argument_last() {
        let mut t = Affine2::from_translation(10.0, 0.0);
        t.preconcatenate(&Affine2::screen_scale(2.0, 2.0, 0.0, 0.0));
        assert!(close(t.apply_point(1.0, 1.0), (22.0, 2.0)));
    }

    #[test]
    fn inverse_round_trips_points() {
        let mut t = Affine2::from_rotation(0.3);
        t.scale(1.7).translate(-4.0, 9.5);
        let inv = t.inverse().unwrap();
        let (x, y) = t.apply_point(3.0, -2.0);
        assert!(close(inv.apply_point(x, y), (3.0, -2.0)));
    }

    #[test]
    fn rotate_about_keeps_center_fixed() {
        let mut t = Affine2::identity();
        t.rotate_about(1.1, 50.0, 20.0);
        assert!(close(t.apply_point(50.0, 20.0), (50.0, 20.0)));
    }

    #[test]
    fn degenerate_scale_has_no_inverse() {
        assert!(Affine2::screen_scale(0.0, 1.0, 0.0, 0.0).inverse().is_none());
    }

    #[test]
    fn set_copies_all_entries() {
        let src = Affine2::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let mut dst = Affine2::identity();
        dst.set(&src);
        assert_eq!(dst, src);
        assert_eq!(dst.translation(1), 6.0);
    }
}
