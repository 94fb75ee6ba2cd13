pub mod ga;
pub mod run;

pub use ga::GaConfig;
pub use run::RunConfig;

use crate::error::GaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub ga: GaConfig,
    pub run: RunConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GaError> {
        self.ga.validate()?;
        self.run.validate()?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GaError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GaError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| GaError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GaError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| GaError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| GaError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
