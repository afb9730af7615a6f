use crate::core::forcefield::pose::DockingState;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::rigid_body::RigidBody;
use crate::core::utils::geometry::calculate_rmsd;
use crate::engine::error::EngineError;
use std::path::Path;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct TransformResult {
    /// The ligand at the requested pose, with the pose kept as its transform.
    pub ligand: RigidBody,
    /// RMSD between the input and the moved coordinates.
    pub rmsd: f64,
}

/// Places `ligand` at `state` exactly as the evaluators do: the ligand is
/// centered on its geometric center, rotated, moved back and translated.
#[instrument(skip_all, name = "transform_workflow")]
pub fn run(ligand: &RigidBody, state: &DockingState) -> TransformResult {
    let center = ligand.find_center();
    let mut moved = ligand.centered();
    state.apply(&mut moved, &center);
    debug!(transform = %moved.coords_array().matrix_dump(), "Pose transform assembled.");

    let rmsd = calculate_rmsd(ligand.world_coords(), moved.world_coords()).unwrap_or(0.0);
    info!(atoms = moved.len(), rmsd, %state, "Ligand moved to pose.");
    TransformResult { ligand: moved, rmsd }
}

/// Runs [`run`] and writes the moved ligand as PDB to `output`.
pub fn run_to_file(
    ligand: &RigidBody,
    state: &DockingState,
    output: &Path,
) -> Result<TransformResult, EngineError> {
    let result = run(ligand, state);
    PdbFile::write_to_path(&result.ligand, output).map_err(|source| EngineError::Output {
        path: output.display().to_string(),
        source,
    })?;
    info!(path = %output.display(), "Wrote transformed ligand.");
    Ok(result)
}
