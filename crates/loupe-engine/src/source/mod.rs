//! Render sources: what gets drawn.
//!
//! A [`RenderSource`] bundles three things the renderer needs per pass:
//! a continuous sampler over source space, the source-to-global transform,
//! and the converter turning samples into ARGB pixels. Loading image formats
//! is left to the embedding application; [`ArrayImg`] and [`FnSampler`]
//! cover in-memory and procedural data, and [`InterpolatingSource`] lets a
//! viewer flip an array between nearest-neighbor and n-linear sampling.

mod array;
mod interpolating;
mod interpolation;
mod sampler;
mod value;

pub use array::ArrayImg;
pub use interpolating::{InterpolatedSampler, Interpolation, InterpolatingSource};
pub use interpolation::{MAX_DIMENSIONS, NLinear, NearestNeighbor};
pub use sampler::{FnSampler, RealSampler};
pub use value::RealValue;

use crate::coords::AffineTransform;
use crate::paint::Converter;

/// Everything a render pass reads from the data side.
pub trait RenderSource<A: AffineTransform>: Send + Sync {
    type Value;
    type Sampler: RealSampler<Value = Self::Value>;
    type Converter: Converter<Self::Value>;

    fn interpolated_sampler(&self) -> &Self::Sampler;

    /// Source-to-global transform, read once per pass.
    fn source_transform(&self) -> A;

    fn converter(&self) -> &Self::Converter;
}

/// Plain [`RenderSource`] built from its three parts.
#[derive(Debug, Clone)]
pub struct SimpleSource<A, S, C> {
    sampler: S,
    transform: A,
    converter: C,
}

impl<A, S, C> SimpleSource<A, S, C>
where
    A: AffineTransform,
    S: RealSampler,
    C: Converter<S::Value>,
{
    pub fn new(sampler: S, transform: A, converter: C) -> Self {
        Self { sampler, transform, converter }
    }

    /// Source with an identity calibration.
    pub fn uncalibrated(sampler: S, converter: C) -> Self {
        Self::new(sampler, A::identity(), converter)
    }
}

impl<A, S, C> RenderSource<A> for SimpleSource<A, S, C>
where
    A: AffineTransform,
    S: RealSampler,
    C: Converter<S::Value>,
{
    type Value = S::Value;
    type Sampler = S;
    type Converter = C;

    #[inline]
    fn interpolated_sampler(&self) -> &S {
        &self.sampler
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
