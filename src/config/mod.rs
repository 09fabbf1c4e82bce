//! Configuration module for framewire
//!
//! Runtime configuration is a small TOML document. Every field has a
//! default, so an empty file (or no file at all) is a valid configuration.
//!
//! # Example
//!
//! ```toml
//! version = 1
//!
//! [ports]
//! default_queue_capacity = 4
//!
//! [runner]
//! max_steps = 10000
//!
//! [logging]
//! filter = "info,framewire=debug"
//! ```
//!
//! ```ignore
//! use framewire::config::RuntimeConfig;
//!
//! let config = RuntimeConfig::load("framewire.toml")?;
//! let graph = FilterGraph::with_settings(config.ports.clone());
//! ```

use crate::error::{FramewireError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Queue capacity of input ports that do not declare their own
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Step limit of a sequential run
pub const DEFAULT_MAX_STEPS: u64 = 100_000;

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Current configuration file format version
pub const CONFIG_VERSION: u32 = 1;

/// Top-level runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Configuration format version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    /// Port defaults applied when filters join a graph
    #[serde(default)]
    pub ports: PortSettings,

    /// Sequential runner limits
    #[serde(default)]
    pub runner: RunnerSettings,

    /// Logging setup for the binary
    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ports: PortSettings::default(),
            runner: RunnerSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| FramewireError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FramewireError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load a configuration file, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the configuration to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    FramewireError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| FramewireError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            FramewireError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.ports.default_queue_capacity == 0 {
            return Err(FramewireError::Config(
                "ports.default_queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.runner.max_steps == 0 {
            return Err(FramewireError::Config(
                "runner.max_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Port defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSettings {
    /// Capacity given to input ports whose descriptor leaves it open
    #[serde(default = "default_queue_capacity")]
    pub default_queue_capacity: usize,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            default_queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Runner limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerSettings {
    /// Maximum number of scheduling steps before a run is stopped
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,
}

fn default_max_steps() -> u64 {
    DEFAULT_MAX_STEPS
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
