use crate::cli::ScoreArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use rigidock::core::models::rigid_body::RigidBody;
use rigidock::workflows::{self, score::ScoreReport};
use std::path::Path;
use tracing::info;

const COMPONENTS: [&str; 6] = ["phi", "ssi", "rot", "x", "y", "z"];

pub fn run(args: ScoreArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args)?;

    let receptor = load_body(&config.receptor_path)?;
    let ligand = load_body(&config.ligand_path)?;
    info!(
        receptor_atoms = receptor.len(),
        ligand_atoms = ligand.len(),
        "Loaded input structures."
    );

    let report = workflows::score::run(
        &receptor,
        &ligand,
        &config.core_config,
        &config.state,
        config.numerical,
    )?;

    print!("{}", format_report(&report));
    Ok(())
}

pub(crate) fn load_body(path: &Path) -> Result<RigidBody> {
    info!("Loading structure from {:?}", path);
    RigidBody::from_pdb(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn format_report(report: &ScoreReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Variant:    {}\n", report.variant));
    out.push_str(&format!("Pose:       {}\n", report.state));
    out.push_str(&format!("Pairs:      {}\n", report.pair_count));
    out.push_str(&format!("VdW:        {:>16.6} kcal/mol\n", report.energy.vdw));
    out.push_str(&format!("Coulomb:    {:>16.6} kcal/mol\n", report.energy.coulomb));
    if report.energy.restraint != 0.0 {
        out.push_str(&format!(
            "Restraint:  {:>16.6} kcal/mol\n",
            report.energy.restraint
        ));
    }
    out.push_str(&format!("Total:      {:>16.6} kcal/mol\n", report.total_energy()));

    out.push_str("Gradient:\n");
    for (k, name) in COMPONENTS.iter().enumerate() {
        match report.numerical_gradient {
            Some(numerical) => out.push_str(&format!(
                "  {:<4}{:>16.6}{:>16.6}\n",
                name, report.gradient[k], numerical[k]
            )),
            None => out.push_str(&format!("  {:<4}{:>16.6}\n", name, report.gradient[k])),
        }
    }
    if let Some(deviation) = report.max_gradient_deviation() {
        out.push_str(&format!("Max |analytic - numerical|: {:.3e}\n", deviation));
    }
    out
}
