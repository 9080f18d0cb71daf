//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - rendered by a reporting/serialization layer after convergence
//! - reloaded later for plotting or comparisons

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Spectroscopic technique the titration was recorded with.
///
/// The technique decides what the regression observable is. NMR chemical
/// shifts are population-weighted averages over host environments, so species
/// concentrations are always reduced to mole fractions of total host. UV
/// absorbance is linear in absolute concentration, so raw concentrations are
/// used unless the caller forces a mole-fraction basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technique {
    Nmr,
    Uv,
}

/// Host:guest ratio assumed for the binding equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stoichiometry {
    /// One host binds one guest; closed-form quadratic for `[HG]`.
    #[serde(rename = "1:1")]
    OneToOne,
    /// One host binds up to two guests; cubic in the free guest concentration.
    #[serde(rename = "1:2")]
    OneToTwo,
    /// Two hosts bind one guest; the 1:2 cubic with host and guest swapped.
    #[serde(rename = "2:1")]
    TwoToOne,
}

impl Stoichiometry {
    /// Human-readable label for messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Stoichiometry::OneToOne => "1:1",
            Stoichiometry::OneToTwo => "1:2",
            Stoichiometry::TwoToOne => "2:1",
        }
    }

    /// Number of stepwise equilibrium constants (K1, K2, …) the model takes.
    pub fn param_count(self) -> usize {
        match self {
            Stoichiometry::OneToOne => 1,
            Stoichiometry::OneToTwo | Stoichiometry::TwoToOne => 2,
        }
    }

    /// Number of complex-species columns the equilibrium solver produces.
    pub fn species_count(self) -> usize {
        match self {
            Stoichiometry::OneToOne => 1,
            Stoichiometry::OneToTwo | Stoichiometry::TwoToOne => 2,
        }
    }
}

/// A registered binding model: technique plus stoichiometry.
///
/// Parsed from its wire identifier via the model registry
/// (`"nmr1to1".parse::<ModelKey>()`), or constructed directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelKey {
    pub technique: Technique,
    pub stoichiometry: Stoichiometry,
}

impl ModelKey {
    /// Wire identifier, matching the registry key for this model.
    pub fn identifier(self) -> &'static str {
        match (self.technique, self.stoichiometry) {
            (Technique::Nmr, Stoichiometry::OneToOne) => "nmr1to1",
            (Technique::Nmr, Stoichiometry::OneToTwo) => "nmr1to2",
            (Technique::Nmr, Stoichiometry::TwoToOne) => "nmr2to1",
            (Technique::Uv, Stoichiometry::OneToOne) => "uv1to1",
            (Technique::Uv, Stoichiometry::OneToTwo) => "uv1to2",
            (Technique::Uv, Stoichiometry::TwoToOne) => "uv2to1",
        }
    }
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// One titration run: total concentrations and the observed signal matrix.
///
/// `h0[i]` / `g0[i]` are total host / guest concentrations at observation `i`;
/// `y[d][i]` is the observed signal on detection channel `d` (e.g. one NMR
/// peak per channel). All channels share the observation axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitrationData {
    h0: Vec<f64>,
    g0: Vec<f64>,
    y: Vec<Vec<f64>>,
}

impl TitrationData {
    /// Build a titration dataset, rejecting mismatched shapes up front.
    pub fn new(h0: Vec<f64>, g0: Vec<f64>, y: Vec<Vec<f64>>) -> Result<Self, EngineError> {
        let data = Self { h0, g0, y };
        data.validate()?;
        Ok(data)
    }

    /// Check that `h0`, `g0`, and every `y` channel agree on length.
    ///
    /// Called by [`TitrationData::new`] and again at every objective
    /// evaluation, so data arriving through deserialization is still rejected
    /// before any computation starts.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.g0.len() != self.h0.len() {
            return Err(EngineError::ShapeMismatch(format!(
                "h0 has {} observations but g0 has {}",
                self.h0.len(),
                self.g0.len()
            )));
        }
        if self.y.is_empty() {
            return Err(EngineError::ShapeMismatch(
                "y has no detection channels".to_owned(),
            ));
        }
        for (d, channel) in self.y.iter().enumerate() {
            if channel.len() != self.h0.len() {
                return Err(EngineError::ShapeMismatch(format!(
                    "y channel {d} has {} observations, expected {}",
                    channel.len(),
                    self.h0.len()
                )));
            }
        }
        Ok(())
    }

    pub fn observations(&self) -> usize {
        self.h0.len()
    }

    pub fn channels(&self) -> usize {
        self.y.len()
    }

    pub fn h0(&self) -> &[f64] {
        &self.h0
    }

    pub fn g0(&self) -> &[f64] {
        &self.g0
    }

    pub fn y(&self) -> &[Vec<f64>] {
        &self.y
    }

    /// Guest equivalents `g0/h0` per observation, the conventional x-axis for
    /// isotherm plots.
    pub fn guest_equivalents(&self) -> Vec<f64> {
        self.h0
            .iter()
            .zip(self.g0.iter())
            .map(|(&h, &g)| g / h)
            .collect()
    }
}

/// Full fit evaluation for reporting and plotting after convergence.
///
/// Row-oriented `Vec`s rather than matrix types so a serialization layer can
/// render it directly: `fitted` and `residuals` mirror the input `y` layout
/// (channels × observations), `coefficients` holds one vector per channel
/// (length = species count), and `species` is the converted species matrix
/// transposed (species × observations, one column per observation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub fitted: Vec<Vec<f64>>,
    /// Fitted minus observed, per channel.
    pub residuals: Vec<Vec<f64>>,
    pub coefficients: Vec<Vec<f64>>,
    pub species: Vec<Vec<f64>>,
    /// Effective rank of the species matrix in the response regression.
    pub rank: usize,
    /// Singular values of the species matrix, largest first.
    pub singular_values: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titration_data_accepts_consistent_shapes() {
        let data = TitrationData::new(
            vec![1e-3, 1e-3],
            vec![0.0, 2e-3],
            vec![vec![7.2, 7.6], vec![3.1, 3.4]],
        )
        .unwrap();
        assert_eq!(data.observations(), 2);
        assert_eq!(data.channels(), 2);
    }

    #[test]
    fn titration_data_rejects_g0_length_mismatch() {
        let err = TitrationData::new(vec![1e-3, 1e-3], vec![0.0], vec![vec![7.2, 7.6]]).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn titration_data_rejects_ragged_channels() {
        let err = TitrationData::new(
            vec![1e-3, 1e-3],
            vec![0.0, 2e-3],
            vec![vec![7.2, 7.6], vec![3.1]],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn titration_data_rejects_empty_y() {
        let err = TitrationData::new(vec![1e-3], vec![2e-3], vec![]).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn guest_equivalents_divide_pointwise() {
        let data = TitrationData::new(
            vec![1e-3, 2e-3],
            vec![2e-3, 2e-3],
            vec![vec![0.0, 0.0]],
        )
        .unwrap();
        assert_eq!(data.guest_equivalents(), vec![2.0, 1.0]);
    }

    #[test]
    fn model_key_identifier_round_trips_display() {
        let key = ModelKey {
            technique: Technique::Uv,
            stoichiometry: Stoichiometry::TwoToOne,
        };
        assert_eq!(key.to_string(), "uv2to1");
    }
}
