//! Configuration for the event graph tools
//!
//! Values come from built-in defaults, then an optional YAML file, then
//! `EVENTFLOW_*` environment variables. The resulting struct is passed
//! explicitly to whatever needs it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::data::{parse_iso_date, DateWindow};
use crate::spatial::marker::{DEFAULT_GROWTH_RATE, DEFAULT_MAX_RADIUS};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventflowConfig {
    /// Directory holding `<actorID>_nodes.csv` / `<actorID>_edges.csv`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Default date window
    #[serde(default)]
    pub window: WindowConfig,

    /// Picking and marker sizing
    #[serde(default)]
    pub spatial: SpatialConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl WindowConfig {
    pub fn date_window(&self) -> DateWindow {
        DateWindow {
            start: self.start,
            end: self.end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialConfig {
    /// Picks farther than this from every indexed point miss
    #[serde(default = "default_pick_tolerance")]
    pub pick_tolerance: f64,

    /// Upper bound of the marker radius
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,

    /// How quickly markers grow with their weight
    #[serde(default = "default_growth_rate")]
    pub growth_rate: f64,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            pick_tolerance: default_pick_tolerance(),
            max_radius: default_max_radius(),
            growth_rate: default_growth_rate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_pick_tolerance() -> f64 {
    5.0
}

fn default_max_radius() -> f64 {
    DEFAULT_MAX_RADIUS
}

fn default_growth_rate() -> f64 {
    DEFAULT_GROWTH_RATE
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for EventflowConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            window: WindowConfig::default(),
            spatial: SpatialConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EventflowConfig {
    /// Load configuration from an optional file and the process environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        info!(data_dir = %config.data_dir.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Applies `EVENTFLOW_*` overrides looked up through `lookup`. Values
    /// that do not parse are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("EVENTFLOW_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        for (key, slot) in [
            ("EVENTFLOW_WINDOW_START", &mut self.window.start),
            ("EVENTFLOW_WINDOW_END", &mut self.window.end),
        ] {
            if let Some(raw) = lookup(key) {
                match parse_iso_date(&raw) {
                    Ok(date) => *slot = Some(date),
                    Err(_) => warn!("Invalid {} value: {}", key, raw),
                }
            }
        }

        for (key, slot) in [
            ("EVENTFLOW_PICK_TOLERANCE", &mut self.spatial.pick_tolerance),
            ("EVENTFLOW_MAX_RADIUS", &mut self.spatial.max_radius),
            ("EVENTFLOW_GROWTH_RATE", &mut self.spatial.growth_rate),
        ] {
            if let Some(raw) = lookup(key) {
                match raw.parse::<f64>() {
                    Ok(value) => *slot = value,
                    Err(_) => warn!("Invalid {} value: {}", key, raw),
                }
            }
        }

        if let Some(filter) = lookup("EVENTFLOW_LOG") {
            self.logging.filter = filter;
        }
        if let Some(raw) = lookup("EVENTFLOW_LOG_JSON") {
            match raw.parse::<bool>() {
                Ok(json) => self.logging.json = json,
                Err(_) => warn!("Invalid EVENTFLOW_LOG_JSON value: {}", raw),
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |key: &str, reason: &str| ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        if !(self.spatial.pick_tolerance > 0.0) {
            return Err(invalid("spatial.pick_tolerance", "must be positive"));
        }
        if !(self.spatial.max_radius > 2.0) {
            return Err(invalid("spatial.max_radius", "must be greater than 2"));
        }
        if !(self.spatial.growth_rate > 0.0) {
            return Err(invalid("spatial.growth_rate", "must be positive"));
        }
        if let (Some(start), Some(end)) = (self.window.start, self.window.end) {
            if start > end {
                return Err(invalid("window", "start is after end"));
            }
        }
        Ok(())
    }
}
