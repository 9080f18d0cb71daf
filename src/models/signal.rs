//! Conversion from species concentrations to the measured observable.

use nalgebra::DMatrix;

use crate::domain::Technique;

/// Adapt raw complex concentrations to the quantity the technique measures.
///
/// NMR chemical shifts are population-weighted averages over host
/// environments, so every species column is reduced to a mole fraction of
/// total host. Absorbance is linear in absolute concentration, so UV data
/// keeps raw concentrations unless `force_molefrac` asks for a
/// fraction-basis comparison.
///
/// Division by `h0[i] == 0` produces non-finite entries at that observation;
/// the regression stage turns those into a non-finite merit value.
pub fn to_observable(
    mut species: DMatrix<f64>,
    h0: &[f64],
    technique: Technique,
    force_molefrac: bool,
) -> DMatrix<f64> {
    if technique == Technique::Nmr || force_molefrac {
        for (i, &h) in h0.iter().enumerate() {
            for v in species.row_mut(i).iter_mut() {
                *v /= h;
            }
        }
    }
    species
}
