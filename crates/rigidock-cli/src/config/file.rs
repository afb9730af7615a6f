use crate::error::{CliError, Result};
use rigidock::engine::config::ForceFieldVariant;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileForcefieldConfig {
    pub variant: Option<ForceFieldVariant>,
    pub params_path: Option<PathBuf>,
    pub cutoff: Option<f64>,
    pub restraint: Option<f64>,
}

/// Starting ligand pose; omitted parts stay at zero.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePoseConfig {
    /// `[phi, ssi, rot]` in radians.
    pub euler: Option<[f64; 3]>,
    pub translation: Option<[f64; 3]>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub forcefield: Option<FileForcefieldConfig>,
    pub pose: Option<FilePoseConfig>,
}

impl FileConfig {
    /// Reads a TOML configuration file. A relative `params-path` is resolved
    /// against the directory holding the file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: FileConfig =
            toml::from_str(&content).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        if let Some(params_path) = config
            .forcefield
            .as_mut()
            .and_then(|ff| ff.params_path.as_mut())
        {
            if params_path.is_relative() {
                if let Some(dir) = path.parent() {
                    *params_path = dir.join(&*params_path);
                }
            }
        }
        Ok(config)
    }
}
