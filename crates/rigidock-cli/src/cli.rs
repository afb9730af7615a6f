use crate::utils::parser::parse_pose;
use clap::{Args, Parser, Subcommand};
use rigidock::core::forcefield::pose::DockingState;
use rigidock::engine::config::ForceFieldVariant;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "rigidock - score rigid receptor/ligand complexes with reduced-model force fields.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the interaction energy and its generalized gradient for one ligand pose.
    Score(ScoreArgs),
    /// Write the ligand moved to a docking pose.
    Transform(TransformArgs),
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Receptor structure in reduced-model PDB format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub receptor: PathBuf,

    /// Ligand structure in reduced-model PDB format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ligand: PathBuf,

    /// Configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ligand pose as 'phi,ssi,rot,x,y,z'. Defaults to the input pose.
    #[arg(long, value_name = "POSE", value_parser = parse_pose, allow_hyphen_values = true)]
    pub pose: Option<DockingState>,

    /// Override the force field variant (attract or legacy).
    #[arg(long, value_name = "NAME")]
    pub variant: Option<ForceFieldVariant>,

    /// Override the force field parameter file.
    #[arg(short, long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// Override the pair-list cutoff in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Override the restraint spring constant (legacy variant only).
    #[arg(long, value_name = "FLOAT")]
    pub restraint: Option<f64>,

    /// Also report central-difference derivatives.
    #[arg(long)]
    pub numerical: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S forcefield.cutoff=12
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `transform` subcommand.
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Ligand structure in reduced-model PDB format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ligand: PathBuf,

    /// Path for the transformed ligand.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Ligand pose as 'phi,ssi,rot,x,y,z'.
    #[arg(long, required = true, value_name = "POSE", value_parser = parse_pose, allow_hyphen_values = true)]
    pub pose: DockingState,
}
