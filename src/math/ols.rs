//! Least squares solver backing the response regression.
//!
//! Every objective evaluation solves a small linear problem per detection
//! channel: predicted species concentrations (n observations × at most two
//! columns) against observed signal.
//!
//! Implementation choices:
//! - SVD, so tall and rank-deficient systems both work: singular values below
//!   tolerance are dropped, which turns rank deficiency into a least-norm
//!   solve instead of a failure.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)
//! - The decomposition is computed once per evaluation and reused for every
//!   channel's right-hand side.

use nalgebra::{DMatrix, DVector, Dyn, SVD};

/// Singular values below this are treated as zero.
const SV_TOL: f64 = 1e-12;

/// A precomputed SVD of a design matrix, reusable across right-hand sides.
pub struct LeastSquares {
    svd: SVD<f64, Dyn, Dyn>,
}

impl LeastSquares {
    pub fn new(x: &DMatrix<f64>) -> Self {
        Self {
            svd: x.clone().svd(true, true),
        }
    }

    /// Minimum-norm least squares solution of `X·β ≈ y`.
    pub fn solve(&self, y: &DVector<f64>) -> DVector<f64> {
        // The SVD above is always computed with U and V, so `solve` cannot
        // fail here.
        self.svd.solve(y, SV_TOL).expect("SVD computed with U and V")
    }

    /// Effective rank of the design matrix at the solver tolerance.
    pub fn rank(&self) -> usize {
        self.svd.rank(SV_TOL)
    }

    /// Singular values, largest first.
    pub fn singular_values(&self) -> Vec<f64> {
        self.svd.singular_values.iter().copied().collect()
    }
}
