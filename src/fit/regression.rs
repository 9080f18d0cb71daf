//! Per-channel linear response regression.
//!
//! Inside every nonlinear iteration we solve `species · β ≈ y_channel` by
//! least squares, independently for each detection channel. The coefficients
//! (limiting chemical shifts or molar absorptivities) are derived quantities,
//! recomputed from scratch at every evaluation — they are conditional on the
//! current equilibrium constants, not fit parameters themselves.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::math::LeastSquares;

/// Outcome of regressing observed signal onto predicted species columns.
#[derive(Debug, Clone)]
pub struct Regression {
    /// One coefficient vector per detection channel (length = species count).
    pub coefficients: Vec<DVector<f64>>,
    /// Fitted signal per channel, `species · coefficients`.
    pub fitted: Vec<DVector<f64>>,
    /// Residuals per channel, fitted minus observed.
    pub residuals: Vec<DVector<f64>>,
    /// Effective rank of the species matrix.
    pub rank: usize,
    /// Singular values of the species matrix, largest first.
    pub singular_values: Vec<f64>,
}

impl Regression {
    /// Sum of squared residuals for one channel.
    pub fn channel_ssr(&self, channel: usize) -> f64 {
        self.residuals[channel].iter().map(|r| r * r).sum()
    }

    /// Total sum of squared residuals across channels and observations.
    pub fn total_ssr(&self) -> f64 {
        (0..self.residuals.len()).map(|d| self.channel_ssr(d)).sum()
    }
}

/// Solve the response regression for every channel of `y`.
///
/// The SVD of the species matrix is computed once and reused across
/// channels. A rank-deficient species matrix yields the least-norm solution
/// rather than an error; callers that care about conditioning can inspect
/// `rank` and `singular_values`.
pub fn regress(species: &DMatrix<f64>, y: &[Vec<f64>]) -> Regression {
    // A degenerate input (e.g. h0 = 0) can leave non-finite concentrations.
    // SVD iteration is not defined on those, so short-circuit with non-finite
    // outputs and let the optimizer see the poor merit value.
    if species.iter().any(|v| !v.is_finite()) {
        debug!("regress: non-finite species matrix, returning non-finite residuals");
        return non_finite_regression(species, y);
    }

    let ls = LeastSquares::new(species);

    let mut coefficients = Vec::with_capacity(y.len());
    let mut fitted = Vec::with_capacity(y.len());
    let mut residuals = Vec::with_capacity(y.len());

    for channel in y {
        let observed = DVector::from_column_slice(channel);
        let beta = ls.solve(&observed);
        let fit = species * &beta;
        let res = &fit - &observed;

        coefficients.push(beta);
        fitted.push(fit);
        residuals.push(res);
    }

    Regression {
        coefficients,
        fitted,
        residuals,
        rank: ls.rank(),
        singular_values: ls.singular_values(),
    }
}

fn non_finite_regression(species: &DMatrix<f64>, y: &[Vec<f64>]) -> Regression {
    let n = species.nrows();
    let m = species.ncols();

    Regression {
        coefficients: vec![DVector::from_element(m, f64::NAN); y.len()],
        fitted: vec![DVector::from_element(n, f64::NAN); y.len()],
        residuals: vec![DVector::from_element(n, f64::NAN); y.len()],
        rank: 0,
        singular_values: vec![f64::NAN; n.min(m)],
    }
}
