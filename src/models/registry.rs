//! Static binding-model registry.
//!
//! One immutable map from wire identifier to model key, built at compile
//! time, so "constructed once before any concurrent use and never mutated"
//! holds by construction. Adding a binding model means adding one entry here;
//! no other call site branches on model identity.

use std::str::FromStr;

use phf::phf_map;

use crate::domain::{ModelKey, Stoichiometry, Technique};
use crate::error::EngineError;

/// Registered models, keyed by the identifiers external callers send.
pub static MODELS: phf::Map<&'static str, ModelKey> = phf_map! {
    "nmr1to1" => ModelKey { technique: Technique::Nmr, stoichiometry: Stoichiometry::OneToOne },
    "nmr1to2" => ModelKey { technique: Technique::Nmr, stoichiometry: Stoichiometry::OneToTwo },
    "nmr2to1" => ModelKey { technique: Technique::Nmr, stoichiometry: Stoichiometry::TwoToOne },
    "uv1to1"  => ModelKey { technique: Technique::Uv,  stoichiometry: Stoichiometry::OneToOne },
    "uv1to2"  => ModelKey { technique: Technique::Uv,  stoichiometry: Stoichiometry::OneToTwo },
    "uv2to1"  => ModelKey { technique: Technique::Uv,  stoichiometry: Stoichiometry::TwoToOne },
};

/// Resolve an identifier to its model key.
///
/// An unregistered identifier is a caller programming error, reported as
/// [`EngineError::UnknownModel`].
pub fn lookup(name: &str) -> Result<ModelKey, EngineError> {
    MODELS
        .get(name)
        .copied()
        .ok_or_else(|| EngineError::UnknownModel(name.to_owned()))
}

impl FromStr for ModelKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
    }
}
