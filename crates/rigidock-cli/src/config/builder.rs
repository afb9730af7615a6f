use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FilePoseConfig};
use super::AppConfig;
use crate::cli::ScoreArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use nalgebra::Vector3;
use rigidock::core::forcefield::pose::DockingState;
use rigidock::engine::config as core_config;
use std::str::FromStr;
use tracing::debug;

/// Merges the config file, `-S` overrides and command-line flags (in rising
/// precedence) into the final application configuration.
pub fn build_config(args: &ScoreArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let ff_file = file_config.forcefield.take().unwrap_or_default();

    let variant = args.variant.or(ff_file.variant).unwrap_or(defaults.variant);
    let params_path = args
        .params
        .clone()
        .or(ff_file.params_path)
        .ok_or_else(|| {
            CliError::Config(
                "A parameter file is required either as `forcefield.params-path` in the config file or via --params."
                    .to_string(),
            )
        })?;
    let cutoff = args.cutoff.or(ff_file.cutoff).unwrap_or(defaults.cutoff);
    let restraint = args
        .restraint
        .or(ff_file.restraint)
        .unwrap_or(defaults.restraint);

    let core_config = core_config::ScoringConfigBuilder::new()
        .variant(variant)
        .params_path(params_path)
        .cutoff(cutoff)
        .restraint(restraint)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!(?core_config, "Resolved scoring configuration.");

    let state = args
        .pose
        .unwrap_or_else(|| pose_from_file(file_config.pose.unwrap_or_default()));

    Ok(AppConfig {
        receptor_path: args.receptor.clone(),
        ligand_path: args.ligand.clone(),
        state,
        numerical: args.numerical,
        core_config,
    })
}

fn pose_from_file(pose: FilePoseConfig) -> DockingState {
    let [phi, ssi, rot] = pose.euler.unwrap_or_default();
    let [x, y, z] = pose.translation.unwrap_or_default();
    DockingState::new(phi, ssi, rot, Vector3::new(x, y, z))
}

fn parse_float(key: &str, value: &str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid float value for {}: {}", key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Argument(e.to_string()))?;
        let forcefield = config.forcefield.get_or_insert_with(Default::default);
        match key {
            "forcefield.variant" => {
                let variant = core_config::ForceFieldVariant::from_str(value)
                    .map_err(|e| CliError::Config(e.to_string()))?;
                forcefield.variant = Some(variant);
            }
            "forcefield.params-path" => forcefield.params_path = Some(value.into()),
            "forcefield.cutoff" => forcefield.cutoff = Some(parse_float(key, value)?),
            "forcefield.restraint" => forcefield.restraint = Some(parse_float(key, value)?),
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
