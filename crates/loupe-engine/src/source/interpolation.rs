use std::sync::Arc;

use crate::error::RenderError;

use super::array::ArrayImg;
use super::sampler::RealSampler;
use super::value::RealValue;

/// Highest dimensionality the interpolating samplers accept.
pub const MAX_DIMENSIONS: usize = 8;

// Coordinates past this magnitude are outside any array that fits in memory,
// and still convert to i64 exactly.
const COORD_LIMIT: f64 = (1u64 << 53) as f64;

fn check_dimensions<T>(img: &ArrayImg<T>) -> Result<(), RenderError> {
    if img.num_dimensions() > MAX_DIMENSIONS {
        return Err(RenderError::InvalidSource(format!(
            "{} dimensions, samplers handle at most {MAX_DIMENSIONS}",
            img.num_dimensions()
        )));
    }
    Ok(())
}

/// Integer grid coordinate at or below `x`, `None` when far outside.
#[inline]
fn grid_floor(x: f64) -> Option<i64> {
    let f = x.floor();
    (f.abs() < COORD_LIMIT).then_some(f as i64)
}

/// Nearest-neighbor sampling of an [`ArrayImg`], `background` outside.
///
/// Sample centers sit at integer coordinates; `x` rounds half up.
#[derive(Debug, Clone)]
pub struct NearestNeighbor<T> {
    img: Arc<ArrayImg<T>>,
    background: T,
}

impl<T: Clone + Send + Sync> NearestNeighbor<T> {
    /// Fails for arrays of more than [`MAX_DIMENSIONS`] dimensions.
    pub fn new(img: Arc<ArrayImg<T>>, background: T) -> Result<Self, RenderError> {
        check_dimensions(&img)?;
        Ok(Self { img, background })
    }
}

impl<T: Clone + Send + Sync> RealSampler for NearestNeighbor<T> {
    type Value = T;

    #[inline]
    fn num_dimensions(&self) -> usize {
        self.img.num_dimensions()
    }

    fn sample(&self, position: &[f64]) -> T {
        let mut pos = [0i64; MAX_DIMENSIONS + 1];
        let n = position.len().min(pos.len());
        for (p, &x) in pos.iter_mut().zip(position.iter()) {
            match grid_floor(x + 0.5) {
                Some(i) => *p = i,
                None => return self.background.clone(),
            }
        }
        match self.img.get(&pos[..n]) {
            Some(v) => v.clone(),
            None => self.background.clone(),
        }
    }
}

/// N-linear interpolation of an [`ArrayImg`] as `f64`, `background` outside.
#[derive(Debug, Clone)]
pub struct NLinear<T> {
    img: Arc<ArrayImg<T>>,
    background: f64,
}

impl<T: RealValue> NLinear<T> {
    /// Fails for arrays of more than [`MAX_DIMENSIONS`] dimensions.
    pub fn new(img: Arc<ArrayImg<T>>, background: f64) -> Result<Self, RenderError> {
        check_dimensions(&img)?;
        Ok(Self { img, background })
    }
}

impl<T: RealValue> RealSampler for NLinear<T> {
    type Value = f64;

    #[inline]
    fn num_dimensions(&self) -> usize {
        self.img.num_dimensions()
    }

    fn sample(&self, position: &[f64]) -> f64 {
        let n = self.img.num_dimensions();

        // Coordinates past the array's dimensionality must lie on slice 0.
        if position.iter().skip(n).any(|&x| (x + 0.5).floor() != 0.0) {
            return self.background;
        }

        let mut base = [0i64; MAX_DIMENSIONS];
        let mut frac = [0f64; MAX_DIMENSIONS];
        for d in 0..n {
            let x = position.get(d).copied().unwrap_or(0.0);
            let Some(b) = grid_floor(x) else {
                return self.background;
            };
            base[d] = b;
            frac[d] = x - x.floor();
        }

        let mut acc = 0.0;
        let mut corner = [0i64; MAX_DIMENSIONS];
        for mask in 0u32..(1u32 << n) {
            let mut w = 1.0;
            for d in 0..n {
                if mask & (1 << d) != 0 {
                    corner[d] = base[d] + 1;
                    w *= frac[d];
                } else {
                    corner[d] = base[d];
                    w *= 1.0 - frac[d];
                }
            }
            if w == 0.0 {
                continue;
            }
            let v = match self.img.get(&corner[..n]) {
                Some(v) => v.to_f64(),
                None => self.background,
            };
            acc += w * v;
        }
        acc
    }
}
