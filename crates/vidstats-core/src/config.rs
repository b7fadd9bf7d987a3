use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Window lengths and cohort bounds for a pipeline run.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Trailing window for the short benchmark, in months.
    pub short_window_months: u32,
    /// Trailing window for the long benchmark. Normalization is relative to this one.
    pub long_window_months: u32,
    /// Trailing publish window defining the cohort for the views curve.
    pub cohort_window_months: u32,
    /// Last day-offset (inclusive) kept in the cohort curve.
    pub cohort_max_day: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            short_window_months: 6,
            long_window_months: 12,
            cohort_window_months: 12,
            cohort_max_day: 30,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_window_months == 0
            || self.long_window_months == 0
            || self.cohort_window_months == 0
        {
            return Err(ConfigError::Invalid(
                "window lengths must be at least one month".to_string(),
            ));
        }
        if self.short_window_months > self.long_window_months {
            return Err(ConfigError::Invalid(format!(
                "short window ({} months) exceeds long window ({} months)",
                self.short_window_months, self.long_window_months
            )));
        }
        if self.cohort_max_day < 0 {
            return Err(ConfigError::Invalid(format!(
                "cohort_max_day must be non-negative, got {}",
                self.cohort_max_day
            )));
        }
        Ok(())
    }
}
