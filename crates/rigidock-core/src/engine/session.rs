use super::config::{ForceFieldVariant, ScoringConfig};
use super::error::EngineError;
use crate::core::forcefield::ForceField;
use crate::core::forcefield::attract::AttractForceField;
use crate::core::forcefield::legacy::LegacyForceField;
use crate::core::forcefield::pairlist::PairList;
use crate::core::forcefield::params::ParameterTable;
use crate::core::models::rigid_body::RigidBody;
use std::sync::Arc;
use tracing::{debug, info};

/// Loads the parameter table matching the configured variant.
pub fn load_parameters(config: &ScoringConfig) -> Result<Arc<ParameterTable>, EngineError> {
    let table = match config.variant {
        ForceFieldVariant::Attract => ParameterTable::load_pair_matrix(&config.params_path)?,
        ForceFieldVariant::Legacy => ParameterTable::load_legacy(&config.params_path)?,
    };
    Ok(Arc::new(table))
}

fn check_categories(
    body: &RigidBody,
    name: &'static str,
    table: &ParameterTable,
) -> Result<(), EngineError> {
    match body
        .atoms()
        .iter()
        .position(|atom| atom.category >= table.size())
    {
        Some(atom) => Err(EngineError::CategoryOutOfRange {
            body: name,
            atom,
            category: body.category(atom),
            size: table.size(),
        }),
        None => Ok(()),
    }
}

/// A receptor/ligand complex bound to one configured evaluator.
pub struct ScoringSession {
    forcefield: Box<dyn ForceField>,
    variant: ForceFieldVariant,
    pair_count: usize,
}

impl ScoringSession {
    /// Builds the evaluator selected by `config`.
    ///
    /// Atom categories are checked against the table here so that a malformed
    /// structure file surfaces as an error rather than an out-of-bounds lookup.
    pub fn new(
        receptor: RigidBody,
        ligand: RigidBody,
        params: Arc<ParameterTable>,
        config: &ScoringConfig,
    ) -> Result<Self, EngineError> {
        check_categories(&receptor, "Receptor", &params)?;
        check_categories(&ligand, "Ligand", &params)?;

        let (forcefield, pair_count): (Box<dyn ForceField>, usize) = match config.variant {
            ForceFieldVariant::Attract => {
                let ff = AttractForceField::new(receptor, ligand, params, config.cutoff);
                let pairs = ff.pairlist().len();
                (Box::new(ff), pairs)
            }
            ForceFieldVariant::Legacy => {
                let mut ff = LegacyForceField::new(receptor, ligand, params, config.cutoff);
                ff.set_restraint(config.restraint);
                let pairs = ff.pairlist().len();
                (Box::new(ff), pairs)
            }
        };

        info!(
            variant = %config.variant,
            pairs = pair_count,
            cutoff = config.cutoff,
            "Scoring session ready."
        );
        if config.variant == ForceFieldVariant::Attract && config.restraint != 0.0 {
            debug!("Restraint strength is ignored by the attract variant.");
        }

        Ok(Self {
            forcefield,
            variant: config.variant,
            pair_count,
        })
    }

    pub fn variant(&self) -> ForceFieldVariant {
        self.variant
    }

    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    pub fn forcefield(&self) -> &dyn ForceField {
        self.forcefield.as_ref()
    }

    pub fn forcefield_mut(&mut self) -> &mut dyn ForceField {
        self.forcefield.as_mut()
    }
}
