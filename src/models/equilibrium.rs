//! Equilibrium species-concentration solvers.
//!
//! Each stoichiometry maps total host/guest concentrations and trial stepwise
//! binding constants to predicted complex concentrations, one observation per
//! row:
//!
//! - 1:1 has a closed-form quadratic solution for `[HG]`
//! - 1:2 reduces to a cubic in the free guest concentration; 2:1 is the same
//!   cubic with the host and guest roles swapped
//!
//! A zero total host concentration is allowed to propagate non-finite values
//! downstream (mole-fraction conversion divides by `h0`); the objective then
//! reports a non-finite merit value rather than an error.

use nalgebra::{Complex, DMatrix};

use crate::domain::Stoichiometry;
use crate::error::EngineError;
use crate::math::{cubic_roots, select_physical_root};

/// Solve for complex-species concentrations.
///
/// Returns an observations × species matrix: one column `[HG]` for 1:1, two
/// columns (`[HG]`, `[HG2]` or `[HG]`, `[H2G]`) for the two-step models.
pub fn solve_equilibrium(
    stoichiometry: Stoichiometry,
    k: &[f64],
    h0: &[f64],
    g0: &[f64],
) -> Result<DMatrix<f64>, EngineError> {
    if k.len() != stoichiometry.param_count() {
        return Err(EngineError::ParameterCount {
            stoichiometry: stoichiometry.display_name(),
            expected: stoichiometry.param_count(),
            got: k.len(),
        });
    }
    if h0.len() != g0.len() {
        return Err(EngineError::ShapeMismatch(format!(
            "h0 has {} observations but g0 has {}",
            h0.len(),
            g0.len()
        )));
    }

    Ok(match stoichiometry {
        Stoichiometry::OneToOne => one_to_one(k[0], h0, g0),
        Stoichiometry::OneToTwo => two_step(k[0], k[1], h0, g0),
        Stoichiometry::TwoToOne => two_step(k[0], k[1], g0, h0),
    })
}

/// Closed-form `[HG]` for the 1:1 equilibrium.
///
/// The root is evaluated in complex arithmetic so a negative discriminant
/// does not panic; a non-real root has no physical branch, and that
/// observation is clamped to the saturation-limit concentration
/// `sqrt(h0·g0)`. This is the single allowed override — every other
/// observation keeps the real quadratic root.
fn one_to_one(k: f64, h0: &[f64], g0: &[f64]) -> DMatrix<f64> {
    DMatrix::from_fn(h0.len(), 1, |i, _| {
        let s = g0[i] + h0[i] + 1.0 / k;
        let disc = Complex::new(s * s - 4.0 * g0[i] * h0[i], 0.0);
        let root = 0.5 * (Complex::new(s, 0.0) - disc.sqrt());

        if root.im != 0.0 {
            (h0[i] * g0[i]).sqrt()
        } else {
            root.re
        }
    })
}

/// Shared two-step solver.
///
/// For 1:2, `bound` is the total host and `free` the total guest (the cubic
/// is solved for free guest); for 2:1 the arguments are swapped and the cubic
/// is solved for free host. With `x` the resolved free concentration:
///
/// - column 0: `[HG]  = bound·K1·x / (1 + K1·x + K1·K2·x²)`
/// - column 1: `[HG2]` (or `[H2G]`) `= bound·K1·K2·x² / (1 + K1·x + K1·K2·x²)`
fn two_step(k1: f64, k2: f64, bound: &[f64], free: &[f64]) -> DMatrix<f64> {
    let n = bound.len();
    let mut out = DMatrix::zeros(n, 2);

    for i in 0..n {
        let b0 = bound[i];
        let f0 = free[i];

        // Mass-balance cubic in the free concentration.
        let a = k1 * k2;
        let b = 2.0 * k1 * k2 * b0 + k1 - f0 * k1 * k2;
        let c = 1.0 + k1 * b0 - k1 * f0;
        let d = -f0;

        let x = select_physical_root(&cubic_roots(a, b, c, d));

        let den = 1.0 + k1 * x + k1 * k2 * x * x;
        out[(i, 0)] = b0 * k1 * x / den;
        out[(i, 1)] = b0 * k1 * k2 * x * x / den;
    }

    out
}
