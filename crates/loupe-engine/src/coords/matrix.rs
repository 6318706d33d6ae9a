//! Row-major `n x (n + 1)` affine matrix kernels shared by [`Affine2`] and
//! [`Affine3`].
//!
//! Entry `(r, c)` lives at `r * (n + 1) + c`; column `n` is the translation.
//!
//! [`Affine2`]: super::Affine2
//! [`Affine3`]: super::Affine3

#[inline]
fn at(n: usize, r: usize, c: usize) -> usize {
    r * (n + 1) + c
}

/// Writes the identity into `m`.
pub(crate) fn identity(n: usize, m: &mut [f64]) {
    debug_assert_eq!(m.len(), n * (n + 1));
    m.fill(0.0);
    for d in 0..n {
        m[at(n, d, d)] = 1.0;
    }
}

/// `out = a * b`, i.e. `b` is applied first.
pub(crate) fn multiply(n: usize, a: &[f64], b: &[f64], out: &mut [f64]) {
    for r in 0..n {
        for c in 0..=n {
            let mut acc = if c == n { a[at(n, r, n)] } else { 0.0 };
            for k in 0..n {
                acc += a[at(n, r, k)] * b[at(n, k, c)];
            }
            out[at(n, r, c)] = acc;
        }
    }
}

/// `target = m * (source, 1)`.
///
/// `source` and `target` must hold at least `n` coordinates; extra
/// coordinates are left untouched.
#[inline]
pub(crate) fn apply(n: usize, m: &[f64], source: &[f64], target: &mut [f64]) {
    for r in 0..n {
        let mut acc = m[at(n, r, n)];
        for c in 0..n {
            acc += m[at(n, r, c)] * source[c];
        }
        target[r] = acc;
    }
}

/// Inverts `m` into `out` by Gauss-Jordan elimination with partial pivoting.
///
/// Returns `false` when the linear part is singular.
pub(crate) fn invert(n: usize, m: &[f64], out: &mut [f64]) -> bool {
    // Augmented [A | I] over the linear part only.
    let w = 2 * n;
    let mut aug = vec![0.0; n * w];
    for r in 0..n {
        for c in 0..n {
            aug[r * w + c] = m[at(n, r, c)];
        }
        aug[r * w + n + r] = 1.0;
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| aug[a * w + col].abs().total_cmp(&aug[b * w + col].abs()))
            .unwrap_or(col);
        let pivot = aug[pivot_row * w + col];
        if pivot.abs() <= f64::MIN_POSITIVE || !pivot.is_finite() {
            return false;
        }
        if pivot_row != col {
            for c in 0..w {
                aug.swap(col * w + c, pivot_row * w + c);
            }
        }

        let inv = 1.0 / pivot;
        for c in 0..w {
            aug[col * w + c] *= inv;
        }

        for r in 0..n {
            if r == col {
                continue;
            }
            let f = aug[r * w + col];
            if f != 0.0 {
                for c in 0..w {
                    aug[r * w + c] -= f * aug[col * w + c];
                }
            }
        }
    }

    // out = [A^-1 | -A^-1 t]
    for r in 0..n {
        let mut t = 0.0;
        for c in 0..n {
            let v = aug[r * w + n + c];
            out[at(n, r, c)] = v;
            t -= v * m[at(n, c, n)];
        }
        out[at(n, r, n)] = t;
    }
    out.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_then_multiply_is_identity() {
        let m = [2.0, 1.0, 5.0, -1.0, 3.0, -7.0];
        let mut inv = [0.0; 6];
        assert!(invert(2, &m, &mut inv));

        let mut prod = [0.0; 6];
        multiply(2, &m, &inv, &mut prod);
        let mut id = [0.0; 6];
        identity(2, &mut id);
        for (a, b) in prod.iter().zip(id.iter()) {
            assert!((a - b).abs() < 1e-12, "{prod:?}");
        }
    }

    #[test]
    fn invert_needs_pivoting() {
        // Zero on the diagonal; only solvable with a row swap.
        let m = [0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 4.0];
        let mut inv = [0.0; 12];
        assert!(invert(3, &m, &mut inv));
        let mut p = [0.0; 3];
        apply(3, &inv, &[2.0, 3.0, 9.0], &mut p);
        assert_eq!(p, [3.0, 2.0, 5.0]);
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let m = [1.0, 2.0, 0.0, 2.0, 4.0, 0.0];
        let mut inv = [0.0; 6];
        assert!(!invert(2, &m, &mut inv));
    }
}
