use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::genome::GenomeConfig;
use super::synthesis::SynthesisConfig;
use super::traits::ConfigSection;
use crate::error::GramevoError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub synthesis: SynthesisConfig,
    pub genome: GenomeConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GramevoError> {
        self.synthesis.validate()?;
        self.genome.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GramevoError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GramevoError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| GramevoError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.config.write().unwrap() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GramevoError> {
        let config = self.config.read().unwrap();
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| GramevoError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| GramevoError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap().clone()
    }

    pub fn update<F>(&self, f: F) -> Result<(), GramevoError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap();
        f(&mut config);
        config.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn toml_round_trip() {
        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.synthesis.population_size = 50;
                c.synthesis.seed = Some(42);
            })
            .unwrap();
        let text = toml::to_string_pretty(&manager.get()).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.synthesis.population_size, 50);
        assert_eq!(parsed.synthesis.seed, Some(42));
    }

    #[test]
    fn update_rejects_invalid_sections() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.genome.codon_max = c.genome.codon_min);
        assert!(result.is_err());
    }
}
