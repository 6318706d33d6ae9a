use std::sync::Arc;

/// Continuous sampler over source space.
///
/// `position` carries at least as many coordinates as the viewing transform
/// has dimensions; coordinates the sampler does not know about are 0.
/// Called concurrently from every kernel worker.
pub trait RealSampler: Send + Sync {
    type Value;

    fn num_dimensions(&self) -> usize;

    fn sample(&self, position: &[f64]) -> Self::Value;
}

impl<S: RealSampler + ?Sized> RealSampler for Arc<S> {
    type Value = S::Value;

    #[inline]
    fn num_dimensions(&self) -> usize {
        (**self).num_dimensions()
    }

    #[inline]
    fn sample(&self, position: &[f64]) -> Self::Value {
        (**self).sample(position)
    }
}

/// Procedural sampler backed by a closure.
pub struct FnSampler<F> {
    dims: usize,
    f: F,
}

impl<F, T> FnSampler<F>
where
    F: Fn(&[f64]) -> T + Send + Sync,
{
    pub fn new(dims: usize, f: F) -> Self {
        Self { dims, f }
    }
}

impl<F> std::fmt::Debug for FnSampler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSampler").field("dims", &self.dims).finish_non_exhaustive()
    }
}

impl<F, T> RealSampler for FnSampler<F>
where
    F: Fn(&[f64]) -> T + Send + Sync,
{
    type Value = T;

    #[inline]
    fn num_dimensions(&self) -> usize {
        self.dims
    }

    #[inline]
    fn sample(&self, position: &[f64]) -> T {
        (self.f)(position)
    }
}
