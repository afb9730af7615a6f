//! # Engine Module
//!
//! Binds loaded structures and force-field parameters into a ready-to-evaluate
//! scoring session.
//!
//! - **Configuration** ([`config`]) - Evaluator variant, parameter file, cutoff and restraint
//! - **Sessions** ([`session`]) - Parameter loading, category validation and evaluator selection
//! - **Error Handling** ([`error`]) - Engine-level errors aggregating the core error types

pub mod config;
pub mod error;
pub mod session;
