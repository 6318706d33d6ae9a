use std::fmt::Debug;

/// Affine transform capability the renderer is generic over.
///
/// Implemented by [`Affine2`](super::Affine2) and [`Affine3`](super::Affine3).
/// Copying is `Clone`. Composition follows the usual matrix convention:
/// `a.concatenate(&b)` yields `a * b`, so `b` is applied first.
pub trait AffineTransform: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Number of spatial dimensions the transform acts on.
    const DIMENSIONS: usize;

    /// Creates the identity transform.
    fn identity() -> Self;

    /// Creates a transform scaling and shifting the first two axes only.
    ///
    /// `x' = sx * x + tx`, `y' = sy * y + ty`; higher axes map to themselves.
    fn screen_scale(sx: f64, sy: f64, tx: f64, ty: f64) -> Self;

    /// Overwrites `self` with `other`.
    #[inline]
    fn set(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// `self = self * other`.
    fn concatenate(&mut self, other: &Self) -> &mut Self;

    /// `self = other * self`.
    fn preconcatenate(&mut self, other: &Self) -> &mut Self;

    /// Returns the inverse, or `None` when the linear part is singular.
    fn inverse(&self) -> Option<Self>;

    /// Maps the first [`DIMENSIONS`](Self::DIMENSIONS) coordinates of `source`
    /// into `target`.
    fn apply(&self, source: &[f64], target: &mut [f64]);

    /// Translation component along axis `d`.
    fn translation(&self, d: usize) -> f64;

    fn set_translation(&mut self, d: usize, value: f64);

    /// Uniformly scales the output space (preconcatenates `s * I`).
    fn scale(&mut self, s: f64) -> &mut Self;
}
