use crate::core::forcefield::pose::{DockingState, STATE_SIZE};
use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::rigid_body::RigidBody;
use crate::engine::config::{ForceFieldVariant, ScoringConfig};
use crate::engine::error::EngineError;
use crate::engine::session::{ScoringSession, load_parameters};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub variant: ForceFieldVariant,
    pub state: DockingState,
    pub energy: EnergyTerm,
    /// `dE/dstate` ordered as `[phi, ssi, rot, x, y, z]`.
    pub gradient: [f64; STATE_SIZE],
    pub numerical_gradient: Option<[f64; STATE_SIZE]>,
    pub pair_count: usize,
}

impl ScoreReport {
    pub fn total_energy(&self) -> f64 {
        self.energy.total()
    }

    /// Largest absolute difference between the analytic and numerical gradients.
    pub fn max_gradient_deviation(&self) -> Option<f64> {
        self.numerical_gradient.map(|numerical| {
            self.gradient
                .iter()
                .zip(numerical.iter())
                .map(|(a, n)| (a - n).abs())
                .fold(0.0, f64::max)
        })
    }
}

/// Scores the ligand at `state` against the receptor.
///
/// Both bodies are taken at their current poses; the pair list is built from
/// those poses before the ligand is moved.
#[instrument(skip_all, name = "score_workflow")]
pub fn run(
    receptor: &RigidBody,
    ligand: &RigidBody,
    config: &ScoringConfig,
    state: &DockingState,
    numerical: bool,
) -> Result<ScoreReport, EngineError> {
    info!(
        variant = %config.variant,
        params = %config.params_path.display(),
        "Loading force field parameters."
    );
    let params = load_parameters(config)?;
    debug!(categories = params.size(), "Parameter table loaded.");

    let mut session = ScoringSession::new(receptor.clone(), ligand.clone(), params, config)?;
    let values = state.to_array();

    let forcefield = session.forcefield_mut();
    forcefield.function(&values);
    let energy = forcefield.energy_breakdown();
    let mut gradient = [0.0; STATE_SIZE];
    forcefield.derivatives(&values, &mut gradient);

    let numerical_gradient = if numerical {
        let mut estimate = [0.0; STATE_SIZE];
        forcefield.numerical_derivatives(&values, &mut estimate);
        Some(estimate)
    } else {
        None
    };

    info!(%energy, %state, "Scoring complete.");

    Ok(ScoreReport {
        variant: session.variant(),
        state: *state,
        energy,
        gradient,
        numerical_gradient,
        pair_count: session.pair_count(),
    })
}
