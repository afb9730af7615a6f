use super::score::load_body;
use crate::cli::TransformArgs;
use crate::error::Result;
use rigidock::workflows;
use tracing::info;

pub fn run(args: TransformArgs) -> Result<()> {
    let ligand = load_body(&args.ligand)?;
    info!(pose = %args.pose, "Moving ligand to pose.");

    let result = workflows::transform::run_to_file(&ligand, &args.pose, &args.output)?;

    println!(
        "Transformed ligand ({} atoms, RMSD {:.3} A from input) written to: {}",
        result.ligand.len(),
        result.rmsd,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parser::parse_pose;
    use rigidock::core::models::rigid_body::RigidBody;
    use std::fs;
    use tempfile::tempdir;

    const LIGAND: &str = "\
ATOM      1 CA   ALA A   1       1.000   2.000   3.000    1  0.000 0 0
ATOM      2 CB   ALA A   1       2.000   2.000   3.000    2  1.000 0 0
";

    #[test]
    fn run_writes_translated_ligand() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lig.pdb");
        let output = dir.path().join("out.pdb");
        fs::write(&input, LIGAND).unwrap();

        run(TransformArgs {
            ligand: input,
            output: output.clone(),
            pose: parse_pose("0,0,0,0,0,-3").unwrap(),
        })
        .unwrap();

        let moved = RigidBody::from_pdb(&output).unwrap();
        assert_eq!(moved.len(), 2);
        assert!((moved.coords(1).z - 0.0).abs() < 1e-9);
        assert_eq!(moved.atom(1).atom_type, "CB");
    }
}
