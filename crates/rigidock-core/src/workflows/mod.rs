//! # Workflows Module
//!
//! End-to-end procedures built on the [`engine`](crate::engine) layer. Each
//! workflow takes already-loaded structures, runs one complete task and returns a
//! plain result value for the caller to report.
//!
//! - **Scoring** ([`score`]) - Energy breakdown and generalized gradient of one pose
//! - **Pose Transformation** ([`transform`]) - Places a ligand at a docking pose

pub mod score;
pub mod transform;
