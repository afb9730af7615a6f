//! # Rigidock Core Library
//!
//! Rigid-body protein docking primitives: lazily transformed atom coordinates,
//! pairwise receptor/ligand force fields and the mapping of atomic forces onto the
//! six docking degrees of freedom.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Data models (`CoordsArray`, `RigidBody`), the
//!   force-field parameter tables and evaluators, PDB I/O and geometry helpers.
//!
//! - **[`engine`]: The Wiring.** Validated configuration and the `ScoringSession`
//!   that loads parameters and selects an evaluator behind the `ForceField` trait.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as scoring a pose
//!   or writing out a transformed ligand.

pub mod core;
pub mod engine;
pub mod workflows;
