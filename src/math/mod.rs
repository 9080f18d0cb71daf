//! Mathematical utilities: cubic root extraction and least squares.

pub mod cubic;
pub mod ols;

pub use cubic::*;
pub use ols::*;
