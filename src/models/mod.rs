//! Binding-model implementations.
//!
//! Models are implemented as small, pure functions so the objective code can
//! stay generic: the registry maps a wire identifier to a `ModelKey`, the
//! equilibrium solver turns trial constants into species concentrations, and
//! the signal converter adapts those to what the technique measures.

pub mod equilibrium;
pub mod registry;
pub mod signal;

pub use equilibrium::*;
pub use registry::*;
pub use signal::*;
