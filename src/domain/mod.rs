//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - model identity (`Technique`, `Stoichiometry`, `ModelKey`)
//! - validated titration input (`TitrationData`)
//! - the detailed fit report (`Evaluation`)

pub mod types;

pub use types::*;
