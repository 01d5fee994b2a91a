pub mod genome;
pub mod manager;
pub mod synthesis;
pub mod traits;

pub use genome::{ExhaustionPolicyKind, GenomeConfig};
pub use manager::{AppConfig, ConfigManager};
pub use synthesis::SynthesisConfig;
