//! # Configuration
//!
//! Every section and key is optional; command-line flags override the file.
//!
//! ```toml
//! [board]
//! model = "stm32f407vet6"
//! snapshot = "pins.toml"
//!
//! [session]
//! connect_timeout_ms = 20000
//! query_timeout_ms = 5000
//! digital_ports = 12
//!
//! [blink]
//! pins = [66, 67]
//! interval_ms = 3000
//!
//! [output]
//! path = "PINS.md"
//! ```

// src/config.rs - Single configuration file
use crate::boards::BoardModel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub blink: BlinkConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which layout to render and where the pin state comes from.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub model: BoardModel,
    /// Recorded pin state. Without one the board is simulated from its layout.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    /// Digital ports to probe; defaults to every port the board reports.
    #[serde(default)]
    pub digital_ports: Option<u8>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            query_timeout_ms: default_query_timeout_ms(),
            digital_ports: None,
        }
    }
}

impl SessionConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlinkConfig {
    #[serde(default = "default_blink_pins")]
    pub pins: Vec<u8>,
    #[serde(default = "default_blink_interval_ms")]
    pub interval_ms: u64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            pins: default_blink_pins(),
            interval_ms: default_blink_interval_ms(),
        }
    }
}

impl BlinkConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Markdown destination; stdout when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid("session.connect_timeout_ms must be > 0".to_string()));
        }
        if self.session.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid("session.query_timeout_ms must be > 0".to_string()));
        }
        if self.blink.pins.is_empty() {
            return Err(ConfigError::Invalid("blink.pins must not be empty".to_string()));
        }
        if self.blink.interval_ms == 0 {
            return Err(ConfigError::Invalid("blink.interval_ms must be > 0".to_string()));
        }
        Ok(())
    }
}

// Default value functions
fn default_connect_timeout_ms() -> u64 { 20_000 }
fn default_query_timeout_ms() -> u64 { 5_000 }
fn default_blink_pins() -> Vec<u8> { vec![66, 67] } // PD14, PD13
fn default_blink_interval_ms() -> u64 { 3_000 }

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let config: Config = match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to parse config TOML: {}", e);
                return Err(ConfigError::Toml(e));
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            return Err(ConfigError::Io(e));
        }
    };
    config.validate()?;
    Ok(config)
}
