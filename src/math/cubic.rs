//! Cubic root extraction and physical branch selection.
//!
//! Mass balance for the 1:2 and 2:1 equilibria reduces, per observation, to a
//! cubic in the free guest (or host) concentration. We take all three roots
//! from the companion matrix of the monic cubic — the eigenvalue route is
//! robust over the coefficient ranges real titrations produce — and then pick
//! the physically meaningful one with an explicit, testable policy.

use nalgebra::{Complex, Matrix3};

/// All roots of `a·x³ + b·x² + c·x + d = 0`, via companion-matrix eigenvalues.
///
/// The leading coefficient must be non-zero; equilibrium callers guarantee
/// this because it is a product of positive binding constants.
pub fn cubic_roots(a: f64, b: f64, c: f64, d: f64) -> [Complex<f64>; 3] {
    let p = b / a;
    let q = c / a;
    let r = d / a;

    #[rustfmt::skip]
    let companion = Matrix3::new(
        0.0, 0.0, -r,
        1.0, 0.0, -q,
        0.0, 1.0, -p,
    );

    let eigen = companion.complex_eigenvalues();
    [eigen[0], eigen[1], eigen[2]]
}

/// Select the physical free-concentration root: the smallest real,
/// non-negative root.
///
/// Real eigenvalues of a real companion matrix come out with an imaginary
/// part of exactly zero, so the realness test is an exact comparison. If no
/// root qualifies, the free concentration resolves to zero — a deliberate
/// fallback policy, not an error, so the optimizer sees a poor merit value
/// instead of an aborted evaluation.
pub fn select_physical_root(roots: &[Complex<f64>]) -> f64 {
    let min = roots
        .iter()
        .filter(|z| z.im == 0.0 && z.re >= 0.0)
        .map(|z| z.re)
        .fold(f64::INFINITY, f64::min);

    if min.is_finite() { min } else { 0.0 }
}
