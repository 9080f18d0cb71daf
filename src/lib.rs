//! `binding-curves` library crate.
//!
//! Pure evaluation engine for host–guest binding isotherms: given a
//! stoichiometry, trial equilibrium constants, and spectroscopic titration
//! data, it computes physically valid equilibrium species concentrations,
//! regresses per-species response coefficients by least squares, and returns
//! residuals in the shapes an external nonlinear optimizer consumes.
//!
//! The crate is a library so that:
//!
//! - the objective function is testable without an optimizer attached
//! - fitting front ends (HTTP services, CLIs, notebooks) can share one engine
//! - evaluations stay pure, stateless, and safe to run concurrently
//!
//! Logging goes through the `log` facade; initializing a logger is the
//! embedding binary's job.

pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
