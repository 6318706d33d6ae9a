use std::ops::Index;

use crate::error::RenderError;

/// Screen-scale factors, finest first.
///
/// Index 0 is the finest level (usually full resolution, `1.0`); increasing
/// indices are strictly coarser. Validated on construction and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenScales {
    factors: Vec<f64>,
}

impl ScreenScales {
    /// Validates `factors`: non-empty, finite, in `(0, 1]`, strictly decreasing.
    pub fn new(factors: Vec<f64>) -> Result<Self, RenderError> {
        if factors.is_empty() {
            return Err(RenderError::InvalidConfig("at least one screen scale is required".into()));
        }
        for (i, &f) in factors.iter().enumerate() {
            if !f.is_finite() || f <= 0.0 || f > 1.0 {
                return Err(RenderError::InvalidConfig(format!(
                    "screen scale #{i} = {f} is outside (0, 1]"
                )));
            }
        }
        if let Some(i) = factors.windows(2).position(|w| w[1] >= w[0]) {
            return Err(RenderError::InvalidConfig(format!(
                "screen scales must be strictly decreasing, got {} then {}",
                factors[i],
                factors[i + 1]
            )));
        }
        Ok(Self { factors })
    }

    /// Full resolution only.
    pub fn single() -> Self {
        Self { factors: vec![1.0] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Index of the coarsest level.
    #[inline]
    pub fn coarsest(&self) -> usize {
        self.factors.len() - 1
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.factors.iter().copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.factors
    }
}

impl Default for ScreenScales {
    fn default() -> Self {
        Self {
            factors: vec![1.0, 0.75, 0.5, 0.25, 0.125],
        }
    }
}

impl Index<usize> for ScreenScales {
    type Output = f64;

    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.factors[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let s = ScreenScales::default();
        assert_eq!(ScreenScales::new(s.as_slice().to_vec()), Ok(s.clone()));
        assert_eq!(s.coarsest(), 4);
        assert_eq!(s[0], 1.0);
    }

    #[test]
    fn rejects_empty() {
        assert!(ScreenScales::new(vec![]).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(ScreenScales::new(vec![1.5, 0.5]).is_err());
        assert!(ScreenScales::new(vec![1.0, 0.0]).is_err());
        assert!(ScreenScales::new(vec![1.0, f64::NAN]).is_err());
    }

    #[test]
    fn rejects_unordered_or_repeated() {
        assert!(ScreenScales::new(vec![0.5, 1.0]).is_err());
        assert!(ScreenScales::new(vec![1.0, 0.5, 0.5]).is_err());
    }

    #[test]
    fn finest_need_not_be_full_resolution() {
        assert!(ScreenScales::new(vec![0.5, 0.25]).is_ok());
    }
}
