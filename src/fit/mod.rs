//! Objective evaluation orchestration.
//!
//! Responsibilities:
//!
//! - regress observed signal onto predicted species columns, per channel
//! - reduce residuals to the shape each optimizer call site needs
//!   (scalar merit, per-channel sums, or the full detailed report)

pub mod objective;
pub mod regression;

pub use objective::*;
pub use regression::*;
