mod data;
mod training;

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

pub use data::DataConfig;
pub use training::{ComparisonConfig, TrainingConfig};

use crate::Result;

/// Everything a lab run needs. Every field is optional in the JSON form and falls back to its
/// default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    pub data: DataConfig,
    pub training: TrainingConfig,
    pub comparison: ComparisonConfig,
}

impl LabConfig {
    /// Reads and validates a JSON config file.
    ///
    /// # Arguments
    /// * `path` - The path of the config file.
    ///
    /// # Returns
    /// The config, or an io, json or validation error.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value before any work starts.
    ///
    /// # Returns
    /// An `InvalidArgument` error for bad data parameters, a `ConfigurationError` for bad
    /// training parameters and `EmptyConfigSet` if there are no learning rates to compare.
    pub fn validate(&self) -> Result<()> {
        self.data.validate()?;
        self.training.validate()?;
        self.comparison.validate()
    }
}
