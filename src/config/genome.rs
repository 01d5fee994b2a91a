use serde::{Deserialize, Serialize};

use super::traits::ConfigSection;
use crate::engine::chromosome::ExhaustionPolicy;
use crate::error::GramevoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExhaustionPolicyKind {
    Fail,
    Wrap,
    Extend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeConfig {
    pub genome_length: usize,
    pub codon_min: i64,
    pub codon_max: i64,
    pub exhaustion_policy: ExhaustionPolicyKind,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            genome_length: 64,
            codon_min: 0,
            codon_max: 256,
            exhaustion_policy: ExhaustionPolicyKind::Wrap,
        }
    }
}

impl GenomeConfig {
    pub fn codon_range(&self) -> std::ops::Range<i64> {
        self.codon_min..self.codon_max
    }

    /// The per-chromosome policy this config asks for; `Extend` draws its
    /// fresh codons from the same configured range.
    pub fn policy(&self) -> ExhaustionPolicy {
        match self.exhaustion_policy {
            ExhaustionPolicyKind::Fail => ExhaustionPolicy::Fail,
            ExhaustionPolicyKind::Wrap => ExhaustionPolicy::Wrap,
            ExhaustionPolicyKind::Extend => ExhaustionPolicy::Extend {
                lo: self.codon_min,
                hi: self.codon_max,
            },
        }
    }
}

impl ConfigSection for GenomeConfig {
    fn section_name() -> &'static str {
        "genome"
    }

    fn validate(&self) -> Result<(), GramevoError> {
        if self.genome_length == 0 {
            return Err(GramevoError::Configuration(
                "Genome length must be at least 1".to_string(),
            ));
        }
        if self.codon_min < 0 {
            return Err(GramevoError::Configuration(
                "Codon range must be non-negative".to_string(),
            ));
        }
        if self.codon_min >= self.codon_max {
            return Err(GramevoError::Configuration(
                "Codon range is empty".to_string(),
            ));
        }
        Ok(())
    }
}
