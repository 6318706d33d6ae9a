use crate::error::RenderError;

/// Dense N-dimensional array, first axis fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayImg<T> {
    dims: Vec<usize>,
    strides: Vec<usize>,
    data: Vec<T>,
}

impl<T> ArrayImg<T> {
    /// Wraps `data` laid out with the first axis fastest.
    pub fn new(dims: Vec<usize>, data: Vec<T>) -> Result<Self, RenderError> {
        if dims.is_empty() {
            return Err(RenderError::InvalidSource("array needs at least one dimension".into()));
        }
        let len = element_count(&dims)?;
        if len != data.len() {
            return Err(RenderError::InvalidSource(format!(
                "dimensions {dims:?} need {len} elements, got {}",
                data.len()
            )));
        }
        let strides = strides_for(&dims);
        Ok(Self { dims, strides, data })
    }

    /// Fills a new array by evaluating `f` at every integer position.
    pub fn from_fn(
        dims: Vec<usize>,
        mut f: impl FnMut(&[usize]) -> T,
    ) -> Result<Self, RenderError> {
        let len = element_count(&dims)?;
        let mut data = Vec::with_capacity(len);
        let mut pos = vec![0usize; dims.len()];
        for _ in 0..len {
            data.push(f(&pos));
            // odometer increment, axis 0 fastest
            for (p, &d) in pos.iter_mut().zip(dims.iter()) {
                *p += 1;
                if *p < d {
                    break;
                }
                *p = 0;
            }
        }
        Self::new(dims, data)
    }

    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn dimensions(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Linear index of an integer position, `None` when outside.
    ///
    /// Missing trailing coordinates are treated as 0.
    #[inline]
    pub fn index_of(&self, pos: &[i64]) -> Option<usize> {
        let mut idx = 0usize;
        for (d, (&extent, &stride)) in self.dims.iter().zip(self.strides.iter()).enumerate() {
            let p = pos.get(d).copied().unwrap_or(0);
            if p < 0 || p as u64 >= extent as u64 {
                return None;
            }
            idx += p as usize * stride;
        }
        // Coordinates beyond our dimensionality must sit on the 0 slice.
        if pos.iter().skip(self.dims.len()).any(|&p| p != 0) {
            return None;
        }
        Some(idx)
    }

    #[inline]
    pub fn get(&self, pos: &[i64]) -> Option<&T> {
        self.index_of(pos).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, pos: &[i64]) -> Option<&mut T> {
        self.index_of(pos).map(move |i| &mut self.data[i])
    }
}

fn element_count(dims: &[usize]) -> Result<usize, RenderError> {
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| RenderError::InvalidSource(format!("dimensions {dims:?} overflow")))
}

fn strides_for(dims: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(dims.len());
    let mut s = 1usize;
    for &d in dims {
        strides.push(s);
        s *= d;
    }
    strides
}
