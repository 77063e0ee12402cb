//! Configuration for a watch session.
//!
//! A `WatchConfig` is built once from a TOML file, environment variables, or
//! CLI flags, then owned read-only by the monitor for the session's lifetime.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Everything a monitoring session needs to know.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Base directories to poll.
    pub paths: Vec<PathBuf>,
    /// Walk the whole tree under each base instead of immediate children.
    pub recursive: bool,
    /// Surface dot-entries; when false, hidden directories are never entered.
    pub include_hidden: bool,
    /// Glob patterns an entry must match (any one) to be watched.
    pub include: Vec<String>,
    /// Glob patterns that drop an entry even when it matched an include.
    pub exclude: Vec<String>,
    /// Seconds between poll ticks.
    pub interval_secs: f64,
    /// Optional append-only log file mirroring the console output.
    pub log_file: Option<PathBuf>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            recursive: false,
            include_hidden: false,
            include: Vec::new(),
            exclude: Vec::new(),
            interval_secs: 5.0,
            log_file: None,
        }
    }
}

impl WatchConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Build a configuration from defaults plus `POLLWATCH_*` environment
    /// overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("POLLWATCH_INTERVAL_SECS") {
            if let Ok(secs) = val.parse::<f64>() {
                config.interval_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("POLLWATCH_RECURSIVE") {
            if let Ok(flag) = val.parse::<bool>() {
                config.recursive = flag;
            }
        }

        if let Ok(val) = std::env::var("POLLWATCH_INCLUDE_HIDDEN") {
            if let Ok(flag) = val.parse::<bool>() {
                config.include_hidden = flag;
            }
        }

        config
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.interval_secs.is_finite() || self.interval_secs <= 0.0 {
            return Err("interval_secs must be a positive number".to_string());
        }
        Ok(())
    }

    /// Polling interval as a `Duration`. Read again before every reschedule.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }
}
