//! Objective evaluation for the external nonlinear optimizer.
//!
//! One evaluation runs the fixed pipeline
//!
//! ```text
//! equilibrium solve → observable conversion → response regression
//! ```
//!
//! and reduces the result to the shape a particular call site needs. Three
//! named entry points share the pipeline so each return shape has its own
//! contract:
//!
//! - [`sum_of_squares`] — scalar merit value for minimizers that only rank
//!   trial parameter vectors
//! - [`channel_residual_sums`] — one sum of squared residuals per detection
//!   channel, the exact shape the Levenberg–Marquardt adapter's per-dimension
//!   bookkeeping expects (changing it breaks convergence, not just format)
//! - [`evaluate`] — full fitted/residual/coefficient report for plotting and
//!   export after convergence
//!
//! Every call is stateless and referentially transparent: identical inputs
//! produce bit-identical outputs.

use log::debug;
use nalgebra::DMatrix;

use crate::domain::{Evaluation, ModelKey, TitrationData};
use crate::error::EngineError;
use crate::fit::regression::{Regression, regress};
use crate::models::{solve_equilibrium, to_observable};

/// Caller-tunable evaluation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOptions {
    /// Mole-fraction-normalize UV data as well. NMR data is always
    /// normalized, so this flag only affects UV models.
    pub force_molefrac: bool,
}

fn pipeline(
    key: ModelKey,
    k: &[f64],
    data: &TitrationData,
    opts: &EvalOptions,
) -> Result<(DMatrix<f64>, Regression), EngineError> {
    data.validate()?;

    let species = solve_equilibrium(key.stoichiometry, k, data.h0(), data.g0())?;
    let observable = to_observable(species, data.h0(), key.technique, opts.force_molefrac);
    let regression = regress(&observable, data.y());

    debug!(
        "pipeline {key}: {} obs × {} species, rank {}, ssr {:e}",
        observable.nrows(),
        observable.ncols(),
        regression.rank,
        regression.total_ssr()
    );

    Ok((observable, regression))
}

/// Scalar merit value: total sum of squared residuals over all channels and
/// observations.
pub fn sum_of_squares(
    key: ModelKey,
    k: &[f64],
    data: &TitrationData,
    opts: &EvalOptions,
) -> Result<f64, EngineError> {
    let (_, regression) = pipeline(key, k, data, opts)?;
    Ok(regression.total_ssr())
}

/// Per-channel residual reduction: one sum of squared residuals per detection
/// channel, in channel order.
pub fn channel_residual_sums(
    key: ModelKey,
    k: &[f64],
    data: &TitrationData,
    opts: &EvalOptions,
) -> Result<Vec<f64>, EngineError> {
    let (_, regression) = pipeline(key, k, data, opts)?;
    Ok((0..data.channels())
        .map(|d| regression.channel_ssr(d))
        .collect())
}

/// Detailed evaluation for the reporting layer.
///
/// The species matrix comes back transposed (species × observations) so the
/// downstream serializer can emit one row per observation without touching
/// matrix types.
pub fn evaluate(
    key: ModelKey,
    k: &[f64],
    data: &TitrationData,
    opts: &EvalOptions,
) -> Result<Evaluation, EngineError> {
    let (observable, regression) = pipeline(key, k, data, opts)?;

    let rows = |vectors: &[nalgebra::DVector<f64>]| -> Vec<Vec<f64>> {
        vectors.iter().map(|v| v.iter().copied().collect()).collect()
    };

    let species = (0..observable.ncols())
        .map(|j| observable.column(j).iter().copied().collect())
        .collect();

    Ok(Evaluation {
        fitted: rows(&regression.fitted),
        residuals: rows(&regression.residuals),
        coefficients: rows(&regression.coefficients),
        species,
        rank: regression.rank,
        singular_values: regression.singular_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lookup;
    use approx::assert_relative_eq;

    fn nmr_1to1_data() -> TitrationData {
        // Signal synthesized from a single bound-shift coefficient of 1.7 at
        // K = 300, plus a small perturbation on the last point.
        let h0 = vec![1e-3, 1e-3, 1e-3, 1e-3];
        let g0 = vec![2.5e-4, 5e-4, 1e-3, 2e-3];

        let species =
            solve_equilibrium(crate::domain::Stoichiometry::OneToOne, &[300.0], &h0, &g0).unwrap();
        let y: Vec<f64> = (0..4)
            .map(|i| 1.7 * species[(i, 0)] / h0[i] + if i == 3 { 1e-4 } else { 0.0 })
            .collect();

        TitrationData::new(h0, g0, vec![y]).unwrap()
    }

    #[test]
    fn sum_of_squares_is_zero_at_the_generating_constants() {
        let h0 = vec![1e-3, 1e-3, 1e-3];
        let g0 = vec![5e-4, 1e-3, 2e-3];
        let species =
            solve_equilibrium(crate::domain::Stoichiometry::OneToOne, &[300.0], &h0, &g0).unwrap();
        let y: Vec<f64> = (0..3).map(|i| 1.7 * species[(i, 0)] / h0[i]).collect();
        let data = TitrationData::new(h0, g0, vec![y]).unwrap();

        let key = lookup("nmr1to1").unwrap();
        let ssr = sum_of_squares(key, &[300.0], &data, &EvalOptions::default()).unwrap();
        assert_relative_eq!(ssr, 0.0, epsilon = 1e-18);
    }

    #[test]
    fn sum_of_squares_matches_channel_sums() {
        let data = nmr_1to1_data();
        let key = lookup("nmr1to1").unwrap();
        let opts = EvalOptions::default();

        let total = sum_of_squares(key, &[250.0], &data, &opts).unwrap();
        let per_channel = channel_residual_sums(key, &[250.0], &data, &opts).unwrap();

        assert_eq!(per_channel.len(), data.channels());
        assert_relative_eq!(total, per_channel.iter().sum::<f64>(), max_relative = 1e-12);
    }

    #[test]
    fn channel_residual_sums_has_one_entry_per_channel() {
        // Two channels generated from different coefficient pairs.
        let h0 = vec![1e-3, 1e-3, 1e-3, 1e-3];
        let g0 = vec![5e-4, 1e-3, 3e-3, 6e-3];
        let species = solve_equilibrium(
            crate::domain::Stoichiometry::OneToTwo,
            &[500.0, 200.0],
            &h0,
            &g0,
        )
        .unwrap();

        let channel = |c1: f64, c2: f64| -> Vec<f64> {
            (0..4)
                .map(|i| (c1 * species[(i, 0)] + c2 * species[(i, 1)]) / h0[i])
                .collect()
        };
        let data =
            TitrationData::new(h0.clone(), g0, vec![channel(1.2, 0.4), channel(-0.3, 2.0)])
                .unwrap();

        let key = lookup("nmr1to2").unwrap();
        let sums =
            channel_residual_sums(key, &[500.0, 200.0], &data, &EvalOptions::default()).unwrap();

        assert_eq!(sums.len(), 2);
        for s in sums {
            assert_relative_eq!(s, 0.0, epsilon = 1e-16);
        }
    }

    #[test]
    fn evaluate_is_bit_identical_across_calls() {
        let data = nmr_1to1_data();
        let key = lookup("nmr1to1").unwrap();
        let opts = EvalOptions::default();

        let a = evaluate(key, &[275.0], &data, &opts).unwrap();
        let b = evaluate(key, &[275.0], &data, &opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn evaluate_reports_transposed_species_and_matching_shapes() {
        let data = nmr_1to1_data();
        let key = lookup("nmr1to1").unwrap();

        let eval = evaluate(key, &[300.0], &data, &EvalOptions::default()).unwrap();

        assert_eq!(eval.fitted.len(), data.channels());
        assert_eq!(eval.fitted[0].len(), data.observations());
        assert_eq!(eval.residuals.len(), data.channels());
        assert_eq!(eval.coefficients[0].len(), 1);
        // species × observations orientation
        assert_eq!(eval.species.len(), 1);
        assert_eq!(eval.species[0].len(), data.observations());

        for (fit, (res, obs)) in eval.fitted[0]
            .iter()
            .zip(eval.residuals[0].iter().zip(data.y()[0].iter()))
        {
            assert_relative_eq!(*res, fit - obs, epsilon = 1e-14);
        }
    }

    #[test]
    fn zero_host_concentration_degrades_instead_of_panicking() {
        let data = TitrationData::new(
            vec![0.0, 1e-3],
            vec![1e-3, 2e-3],
            vec![vec![0.1, 0.2]],
        )
        .unwrap();
        let key = lookup("nmr1to1").unwrap();

        let ssr = sum_of_squares(key, &[300.0], &data, &EvalOptions::default()).unwrap();
        assert!(!ssr.is_finite());
    }

    #[test]
    fn uv_and_forced_molefrac_disagree_on_coefficients() {
        let h0 = vec![1e-3, 1e-3, 1e-3];
        let g0 = vec![5e-4, 1e-3, 4e-3];
        let data = TitrationData::new(h0, g0, vec![vec![0.12, 0.21, 0.38]]).unwrap();
        let key = lookup("uv1to1").unwrap();

        let raw = evaluate(key, &[400.0], &data, &EvalOptions::default()).unwrap();
        let forced = evaluate(
            key,
            &[400.0],
            &data,
            &EvalOptions {
                force_molefrac: true,
            },
        )
        .unwrap();

        // Same fit quality, different coefficient basis: concentrations vs
        // mole fractions differ by the 1e-3 host total.
        assert_relative_eq!(
            raw.coefficients[0][0] / forced.coefficients[0][0],
            1e3,
            max_relative = 1e-9
        );
    }
}
