//! Engine error type.
//!
//! Hard errors are reserved for caller mistakes: an unregistered model
//! identifier, mismatched input shapes, or a wrong-length equilibrium-constant
//! vector. Numerical degeneracy is signalled through values instead — a zero
//! total host concentration propagates non-finite entries, a cubic with no
//! physical root resolves to zero concentration, and a rank-deficient
//! regression returns a least-norm solution. The optimizer sees a poor merit
//! value and steers away rather than crashing.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The model identifier is not present in the registry.
    #[error("unknown binding model `{0}`")]
    UnknownModel(String),

    /// `h0` / `g0` / `y` dimensions disagree, or `y` has no channels.
    #[error("input shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The equilibrium-constant vector length does not match the stoichiometry.
    #[error("stoichiometry {stoichiometry} expects {expected} equilibrium constant(s), got {got}")]
    ParameterCount {
        stoichiometry: &'static str,
        expected: usize,
        got: usize,
    },
}
