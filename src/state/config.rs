use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::cleaning::CleaningOptions;
use crate::error::ConfigError;
use crate::processing::analysis::AnalysisOptions;
use crate::processing::correlation::CorrelationOptions;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub format: ReportFormat,
}

/// User settings persisted as a JSON file. Every field has a default, so a
/// partial file (or `{}`) is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub cleaning: CleaningOptions,
    pub correlation: CorrelationOptions,
    pub report: ReportOptions,
}

impl AdvisorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&json)?;
        tracing::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Config saved to {:?}", path);
        Ok(())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            correlation: self.correlation.clone(),
        }
    }
}
