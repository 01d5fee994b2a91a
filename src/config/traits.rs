use serde::{Deserialize, Serialize};

use crate::error::GramevoError;

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), GramevoError>;
}
