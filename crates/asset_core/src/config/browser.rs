//! # Browser Configuration
//!
//! Every tunable the core consumes, grouped by subsystem. All sections carry
//! `#[serde(default)]` so a config file only needs the keys it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::assets::QualityLevel;
use crate::query::{SortDirection, SortKey};

/// Top-level configuration for an asset browser session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Compression job timing
    pub scheduler: SchedulerSettings,
    /// Canonical viewing frame
    pub normalization: NormalizationSettings,
    /// Initial list and quality state
    pub view: ViewSettings,
    /// Where external models are looked up
    pub assets: AssetSettings,
    /// Logger defaults
    pub logging: LoggingSettings,
}

impl Config for BrowserConfig {}

impl BrowserConfig {
    /// Load from `path` and validate the result
    pub fn load_validated(path: &str) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the core cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "scheduler.tick_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.scheduler.progress_step == 0 {
            return Err(ConfigError::Invalid {
                field: "scheduler.progress_step",
                reason: "must be greater than zero".to_string(),
            });
        }
        let target = self.normalization.target_size;
        if !target.is_finite() || target <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "normalization.target_size",
                reason: format!("must be a positive finite number, got {target}"),
            });
        }
        Ok(())
    }
}

/// Timing of the simulated compression job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Cadence of cosmetic progress ticks
    pub tick_interval_ms: u64,
    /// Progress added per tick, clamped at 100
    pub progress_step: u8,
    /// Delay between starting a job and committing its result
    pub job_latency_ms: u64,
}

impl SchedulerSettings {
    /// Tick cadence as a duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Completion latency as a duration
    pub fn job_latency(&self) -> Duration {
        Duration::from_millis(self.job_latency_ms)
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            progress_step: 10,
            job_latency_ms: 1500,
        }
    }
}

/// Canonical viewing frame for normalized models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationSettings {
    /// Side length of the box every model is fitted into
    pub target_size: f32,
}

impl Default for NormalizationSettings {
    fn default() -> Self {
        Self { target_size: 1.5 }
    }
}

/// Initial list ordering and quality tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Sort key applied to the visible list
    pub sort_key: SortKey,
    /// Sort direction applied to the visible list
    pub sort_direction: SortDirection,
    /// Quality tier active before any job runs
    pub initial_quality: QualityLevel,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            sort_key: SortKey::Name,
            sort_direction: SortDirection::Ascending,
            initial_quality: QualityLevel::High,
        }
    }
}

/// Asset lookup configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directories searched, in order, for external model files
    pub search_paths: Vec<String>,
    /// RON or TOML catalog file; the built-in sample catalog when unset
    pub catalog: Option<String>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            search_paths: vec!["resources/models".to_string(), ".".to_string()],
            catalog: None,
        }
    }
}

/// Logger defaults, overridden by `RUST_LOG`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// env_logger filter directive
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
