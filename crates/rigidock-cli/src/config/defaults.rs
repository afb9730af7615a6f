use rigidock::engine::config::ForceFieldVariant;

pub struct DefaultsConfig {
    pub variant: ForceFieldVariant,
    pub cutoff: f64,
    pub restraint: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            variant: ForceFieldVariant::Attract,
            cutoff: 10.0,
            restraint: 0.0,
        }
    }
}
