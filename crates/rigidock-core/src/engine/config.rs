use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Unknown force field variant '{0}' (expected 'attract' or 'legacy')")]
    UnknownVariant(String),
}

/// Which pairwise evaluator scores the complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForceFieldVariant {
    /// Polarity-switched evaluator reading a 31x31 pair-matrix parameter file.
    #[default]
    Attract,
    /// Single-branch evaluator reading a per-category parameter file.
    Legacy,
}

impl fmt::Display for ForceFieldVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForceFieldVariant::Attract => write!(f, "attract"),
            ForceFieldVariant::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for ForceFieldVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attract" => Ok(ForceFieldVariant::Attract),
            "legacy" => Ok(ForceFieldVariant::Legacy),
            other => Err(ConfigError::UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub variant: ForceFieldVariant,
    pub params_path: PathBuf,
    /// Pair-list cutoff in Angstroms.
    pub cutoff: f64,
    /// Restraint spring constant; only the legacy evaluator uses it.
    pub restraint: f64,
}

#[derive(Default)]
pub struct ScoringConfigBuilder {
    variant: Option<ForceFieldVariant>,
    params_path: Option<PathBuf>,
    cutoff: Option<f64>,
    restraint: Option<f64>,
}

impl ScoringConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variant(mut self, variant: ForceFieldVariant) -> Self {
        self.variant = Some(variant);
        self
    }
    pub fn params_path(mut self, path: PathBuf) -> Self {
        self.params_path = Some(path);
        self
    }
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn restraint(mut self, strength: f64) -> Self {
        self.restraint = Some(strength);
        self
    }

    pub fn build(self) -> Result<ScoringConfig, ConfigError> {
        let cutoff = self.cutoff.ok_or(ConfigError::MissingParameter("cutoff"))?;
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "cutoff",
                reason: format!("must be a positive distance, got {cutoff}"),
            });
        }
        let restraint = self.restraint.unwrap_or(0.0);
        if !restraint.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "restraint",
                reason: format!("must be finite, got {restraint}"),
            });
        }
        Ok(ScoringConfig {
            variant: self
                .variant
                .ok_or(ConfigError::MissingParameter("variant"))?,
            params_path: self
                .params_path
                .ok_or(ConfigError::MissingParameter("params_path"))?,
            cutoff,
            restraint,
        })
    }
}
