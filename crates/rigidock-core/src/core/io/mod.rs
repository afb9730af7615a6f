//! Provides input/output for structure files.
//!
//! Formats implement the [`traits::StructureFile`] trait, which reads a file into a
//! [`crate::core::models::rigid_body::RigidBody`] and writes a body's current world
//! coordinates back out.

pub mod pdb;
pub mod traits;
