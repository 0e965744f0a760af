//! Logger configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ccc_core::errors::{CccError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters of a temperature logging run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Instrument address; prompted for when absent.
    #[serde(default)]
    pub address: Option<String>,
    /// Controller input channels, queried in this order.
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
    /// Number of logging cycles.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Pause between consecutive cycles, in seconds.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,
    /// Pause after each channel query, in milliseconds.
    #[serde(default = "default_query_delay_ms")]
    pub query_delay_ms: u64,
    /// CSV file the readings are appended to.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_channels() -> Vec<String> {
    ["A", "B", "C1", "C2"].iter().map(|ch| ch.to_string()).collect()
}

fn default_iterations() -> u32 {
    10
}

fn default_interval_secs() -> f64 {
    60.0
}

fn default_query_delay_ms() -> u64 {
    100
}

fn default_output() -> PathBuf {
    PathBuf::from("temperatures.csv")
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            address: None,
            channels: default_channels(),
            iterations: default_iterations(),
            interval_secs: default_interval_secs(),
            query_delay_ms: default_query_delay_ms(),
            output: default_output(),
        }
    }
}

impl LoggerConfig {
    /// Parses a YAML document; missing keys take their defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CccError> {
        let config: LoggerConfig = serde_yaml::from_str(contents).map_err(|err| {
            CccError::Config(ErrorInfo::new("ccc_temp.config_yaml", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, CccError> {
        let contents = fs::read_to_string(path)
            .map_err(|err| CccError::io("ccc_temp.config_read", path, err))?;
        Self::from_yaml_str(&contents)
            .map_err(|err| err.with_context("path", path.display().to_string()))
    }

    /// Checks the values the polling loop relies on.
    pub fn validate(&self) -> Result<(), CccError> {
        if self.channels.is_empty() {
            return Err(CccError::Config(ErrorInfo::new(
                "ccc_temp.channels",
                "at least one channel must be configured",
            )));
        }
        if let Some(blank) = self.channels.iter().find(|ch| ch.trim().is_empty()) {
            return Err(CccError::Config(
                ErrorInfo::new("ccc_temp.channels", "channel names must not be blank")
                    .with_context("channel", blank.clone()),
            ));
        }
        if self.iterations == 0 {
            return Err(CccError::Config(
                ErrorInfo::new("ccc_temp.iterations", "iterations must be at least 1")
                    .with_hint("set iterations to the number of rows to log"),
            ));
        }
        self.interval()?;
        Ok(())
    }

    /// Pause between cycles; fails for negative, non-finite or out-of-range values.
    pub fn interval(&self) -> Result<Duration, CccError> {
        Duration::try_from_secs_f64(self.interval_secs).map_err(|err| {
            CccError::Config(
                ErrorInfo::new("ccc_temp.interval", format!("invalid cycle interval: {err}"))
                    .with_context("interval_secs", self.interval_secs.to_string()),
            )
        })
    }

    /// Pause after each channel query.
    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms)
    }
}
