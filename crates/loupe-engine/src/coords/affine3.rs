use super::matrix;
use super::transform::AffineTransform;

/// 3D affine transform, row-major `3 x 4`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine3 {
    m: [f64; 12],
}

impl Default for Affine3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine3 {
    /// Creates a transform from its row-major entries.
    #[inline]
    pub const fn from_rows(m: [f64; 12]) -> Self {
        Self { m }
    }

    #[inline]
    pub fn from_translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut t = Self::identity();
        t.translate(dx, dy, dz);
        t
    }

    /// Rotation by `angle` radians around `axis` (0 = x, 1 = y, 2 = z).
    ///
    /// # Panics
    /// Panics if `axis > 2`.
    pub fn from_rotation(axis: usize, angle: f64) -> Self {
        assert!(axis < 3, "rotation axis out of range: {axis}");
        let (s, c) = angle.sin_cos();
        let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
        let mut t = Self::identity();
        t.set_entry(a, a, c);
        t.set_entry(a, b, -s);
        t.set_entry(b, a, s);
        t.set_entry(b, b, c);
        t
    }

    /// Entry at `(row, col)`; `col == 3` is the translation column.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row * 4 + col]
    }

    #[inline]
    pub fn set_entry(&mut self, row: usize, col: usize, value: f64) {
        self.m[row * 4 + col] = value;
    }

    /// Shifts the output space.
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self {
        self.m[3] += dx;
        self.m[7] += dy;
        self.m[11] += dz;
        self
    }

    /// Rotates the output space around `axis` through the origin.
    pub fn rotate(&mut self, axis: usize, angle: f64) -> &mut Self {
        self.preconcatenate(&Self::from_rotation(axis, angle))
    }

    /// Rotates the output space around `axis` through `(cx, cy, 0)`.
    ///
    /// This is the usual "rotate around the window center" step of an
    /// interactive viewer.
    pub fn rotate_about(&mut self, axis: usize, angle: f64, cx: f64, cy: f64) -> &mut Self {
        self.translate(-cx, -cy, 0.0)
            .rotate(axis, angle)
            .translate(cx, cy, 0.0)
    }

    #[inline]
    pub fn apply_point(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        self.apply(&p, &mut out);
        out
    }
}

impl AffineTransform for Affine3 {
    const DIMENSIONS: usize = 3;

    #[inline]
    fn identity() -> Self {
        let mut m = [0.0; 12];
        matrix::identity(3, &mut m);
        Self { m }
    }

    fn screen_scale(sx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        let mut t = Self::identity();
        t.set_entry(0, 0, sx);
        t.set_entry(1, 1, sy);
        t.set_entry(0, 3, tx);
        t.set_entry(1, 3, ty);
        t
    }

    fn concatenate(&mut self, other: &Self) -> &mut Self {
        let mut out = [0.0; 12];
        matrix::multiply(3, &self.m, &other.m, &mut out);
        self.m = out;
        self
    }

    fn preconcatenate(&mut self, other: &Self) -> &mut Self {
        let mut out = [0.0; 12];
        matrix::multiply(3, &other.m, &self.m, &mut out);
        self.m = out;
        self
    }

    fn inverse(&self) -> Option<Self> {
        let mut out = [0.0; 12];
        matrix::invert(3, &self.m, &mut out).then_some(Self { m: out })
    }

    #[inline]
    fn apply(&self, source: &[f64], target: &mut [f64]) {
        matrix::apply(3, &self.m, source, target);
    }

    #[inline]
    fn translation(&self, d: usize) -> f64 {
        self.get(d, 3)
    }

    #[inline]
    fn set_translation(&mut self, d: usize, value: f64) {
        self.set_entry(d, 3, value);
    }

    fn scale(&mut self, s: f64) -> &mut Self {
        for v in &mut self.m {
            *v *= s;
        }
        self
    }
}
