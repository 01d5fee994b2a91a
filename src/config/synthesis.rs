use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::traits::ConfigSection;
use crate::error::GramevoError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    pub population_size: usize,
    pub max_depth: usize,
    pub ramp_depth_start: usize,
    pub ramp_depth_end: usize,
    pub allow_duplicates: bool,
    pub duplicate_retry_limit: usize,
    pub seed: Option<u64>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            max_depth: 12,
            ramp_depth_start: 2,
            ramp_depth_end: 6,
            allow_duplicates: true,
            duplicate_retry_limit: 100,
            seed: None,
        }
    }
}

impl SynthesisConfig {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl ConfigSection for SynthesisConfig {
    fn section_name() -> &'static str {
        "synthesis"
    }

    fn validate(&self) -> Result<(), GramevoError> {
        if self.population_size == 0 {
            return Err(GramevoError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(GramevoError::Configuration(
                "Max depth must be at least 1".to_string(),
            ));
        }
        if self.ramp_depth_start > self.ramp_depth_end {
            return Err(GramevoError::Configuration(
                "Ramp depth range is inverted".to_string(),
            ));
        }
        if self.ramp_depth_end > self.max_depth {
            return Err(GramevoError::Configuration(
                "Ramp depth range exceeds max depth".to_string(),
            ));
        }
        if self.duplicate_retry_limit == 0 {
            return Err(GramevoError::Configuration(
                "Duplicate retry limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
