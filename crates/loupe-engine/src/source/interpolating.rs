use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::coords::AffineTransform;
use crate::error::RenderError;
use crate::paint::Converter;

use super::array::ArrayImg;
use super::interpolation::{NLinear, NearestNeighbor};
use super::sampler::RealSampler;
use super::value::RealValue;
use super::RenderSource;

/// Interpolation scheme of an [`InterpolatingSource`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    NearestNeighbor,
    NLinear,
}

impl Interpolation {
    /// The other scheme.
    pub fn toggled(self) -> Self {
        match self {
            Interpolation::NearestNeighbor => Interpolation::NLinear,
            Interpolation::NLinear => Interpolation::NearestNeighbor,
        }
    }

    #[inline]
    fn index(self) -> u8 {
        match self {
            Interpolation::NearestNeighbor => 0,
            Interpolation::NLinear => 1,
        }
    }

    #[inline]
    fn from_index(i: u8) -> Self {
        if i & 1 == 0 {
            Interpolation::NearestNeighbor
        } else {
            Interpolation::NLinear
        }
    }
}

/// One fixed interpolation of an [`ArrayImg`], sampled as `f64`.
#[derive(Debug, Clone)]
pub enum InterpolatedSampler<T> {
    Nearest(NearestNeighbor<T>),
    Linear(NLinear<T>),
}

impl<T: RealValue> RealSampler for InterpolatedSampler<T> {
    type Value = f64;

    #[inline]
    fn num_dimensions(&self) -> usize {
        match self {
            InterpolatedSampler::Nearest(s) => s.num_dimensions(),
            InterpolatedSampler::Linear(s) => s.num_dimensions(),
        }
    }

    #[inline]
    fn sample(&self, position: &[f64]) -> f64 {
        match self {
            InterpolatedSampler::Nearest(s) => s.sample(position).to_f64(),
            InterpolatedSampler::Linear(s) => s.sample(position),
        }
    }
}

/// Array-backed source whose interpolation can be switched while it is
/// being displayed.
///
/// The scheme is read once when a pass fetches its sampler, so a switch
/// takes effect on the next pass and never mixes schemes within one.
#[derive(Debug)]
pub struct InterpolatingSource<A, T, C> {
    samplers: [InterpolatedSampler<T>; 2],
    mode: AtomicU8,
    transform: A,
    converter: C,
}

impl<A, T, C> InterpolatingSource<A, T, C>
where
    A: AffineTransform,
    T: RealValue,
    C: Converter<f64>,
{
    /// Starts out nearest-neighbor; `background` is read outside the array.
    pub fn new(
        img: Arc<ArrayImg<T>>,
        background: T,
        transform: A,
        converter: C,
    ) -> Result<Self, RenderError> {
        let nearest = NearestNeighbor::new(Arc::clone(&img), background)?;
        let linear = NLinear::new(img, background.to_f64())?;
        Ok(Self {
            samplers: [
                InterpolatedSampler::Nearest(nearest),
                InterpolatedSampler::Linear(linear),
            ],
            mode: AtomicU8::new(Interpolation::default().index()),
            transform,
            converter,
        })
    }

    pub fn interpolation(&self) -> Interpolation {
        Interpolation::from_index(self.mode.load(Ordering::Acquire))
    }

    pub fn set_interpolation(&self, interpolation: Interpolation) {
        self.mode.store(interpolation.index(), Ordering::Release);
    }

    /// Flips between the two schemes, returning the new one.
    pub fn switch_interpolation(&self) -> Interpolation {
        let old = self.mode.fetch_xor(1, Ordering::AcqRel);
        let now = Interpolation::from_index(old ^ 1);
        log::debug!("interpolation switched to {now:?}");
        now
    }
}

impl<A, T, C> RenderSource<A> for InterpolatingSource<A, T, C>
where
    A: AffineTransform,
    T: RealValue,
    C: Converter<f64>,
{
    type Value = f64;
    type Sampler = InterpolatedSampler<T>;
    type Converter = C;

    fn interpolated_sampler(&self) -> &InterpolatedSampler<T> {
        &self.samplers[usize::from(self.interpolation().index())]
    }

    #[inline]
    fn source_transform(&self) -> A {
        self.transform.clone()
    }

    #[inline]
    fn converter(&self) -> &C {
        &self.converter
    }
}
