use thiserror::Error;

use super::config::ConfigError;
use crate::core::forcefield::params::ParamLoadError;
use crate::core::io::pdb::PdbError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to load force field parameters: {source}")]
    Parameters {
        #[from]
        source: ParamLoadError,
    },

    #[error(
        "{body} atom {atom} has category {category}, but the parameter table only defines {size} categories"
    )]
    CategoryOutOfRange {
        body: &'static str,
        atom: usize,
        category: usize,
        size: usize,
    },

    #[error("Failed to write structure '{path}': {source}")]
    Output { path: String, source: PdbError },
}
