//! # Force Field Module
//!
//! Pairwise reduced-model force fields between a fixed receptor and a mobile
//! ligand, evaluated as a function of the ligand's six rigid-body state
//! variables for use inside an external gradient-based minimizer.
//!
//! ## Key Components
//!
//! - [`params`] - Category pair coefficient tables loaded from parameter files
//! - [`potentials`] - Pair energy kernels (8-6 Lennard-Jones, screened Coulomb, restraint)
//! - [`pairlist`] - Enumeration of candidate receptor/ligand atom pairs
//! - [`derivatives`] - Projection of per-atom forces onto the six state variables
//! - [`attract`] - Polarity-switched evaluator
//! - [`legacy`] - Single-branch evaluator with an optional restraint
//!
//! Both evaluators implement [`ForceField`], so a minimizer can drive either one:
//!
//! ```ignore
//! use rigidock::core::forcefield::{ForceField, attract::AttractForceField};
//!
//! let mut ff = AttractForceField::new(receptor, ligand, params, 10.0);
//! let energy = ff.function(&state);
//! ff.derivatives(&state, &mut gradient);
//! ```

pub mod attract;
pub mod derivatives;
pub mod legacy;
pub mod pairlist;
pub mod params;
pub mod pose;
pub mod potentials;
pub mod term;

use derivatives::GradientConvention;
use pose::STATE_SIZE;
use std::sync::Once;
use term::EnergyTerm;
use tracing::warn;

static NUMERICAL_DERIVATIVES_WARNING: Once = Once::new();

/// Step used by [`ForceField::numerical_derivatives`].
pub const NUMERICAL_STEP: f64 = 1e-3;

/// An energy function of the ligand pose, with its gradient.
pub trait ForceField {
    /// Number of state variables.
    fn problem_size(&self) -> usize {
        STATE_SIZE
    }

    /// Energy of the pose described by `state`.
    fn function(&mut self, state: &[f64]) -> f64;

    /// Writes `dE/dstate` into the first [`ForceField::problem_size`] slots of
    /// `gradient`.
    ///
    /// The energy is recomputed first when `state` differs from the last state
    /// passed to [`ForceField::function`].
    fn derivatives(&mut self, state: &[f64], gradient: &mut [f64]);

    /// Sign relation between the accumulated ligand forces and the gradient.
    fn gradient_convention(&self) -> GradientConvention;

    /// Energy of the last evaluation split by term.
    fn energy_breakdown(&self) -> EnergyTerm;

    /// Central-difference estimate of the gradient.
    ///
    /// Leaves the evaluator at `state`. Intended for checking analytic
    /// derivatives; it costs two energy evaluations per variable.
    fn numerical_derivatives(&mut self, state: &[f64], gradient: &mut [f64]) {
        NUMERICAL_DERIVATIVES_WARNING.call_once(|| {
            warn!("Using numerical derivatives; this is slow and meant for testing only.");
        });

        let n = self.problem_size();
        debug_assert!(state.len() >= n && gradient.len() >= n);
        let mut probe = state[..n].to_vec();
        for j in 0..n {
            probe[j] = state[j] + NUMERICAL_STEP;
            let forward = self.function(&probe);
            probe[j] = state[j] - NUMERICAL_STEP;
            let backward = self.function(&probe);
            probe[j] = state[j];
            gradient[j] = (forward - backward) / (2.0 * NUMERICAL_STEP);
        }
        self.function(state);
    }
}
