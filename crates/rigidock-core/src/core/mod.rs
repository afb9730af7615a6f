//! # Core Module
//!
//! The computational foundation of the library.
//!
//! - **Molecular Representation** ([`models`]) - Transform-cached coordinates, atom properties and rigid bodies
//! - **Energy Calculations** ([`forcefield`]) - Parameter tables, pair lists, evaluators and derivative mapping
//! - **File I/O** ([`io`]) - Reading and writing reduced-model PDB files
//! - **Utilities** ([`utils`]) - Rotation matrices, Euler parametrization and RMSD

pub mod forcefield;
pub mod io;
pub mod models;
pub mod utils;
