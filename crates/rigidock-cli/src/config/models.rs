use rigidock::core::forcefield::pose::DockingState;
use rigidock::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    pub receptor_path: PathBuf,
    pub ligand_path: PathBuf,
    pub state: DockingState,
    pub numerical: bool,
    pub core_config: core_config::ScoringConfig,
}
