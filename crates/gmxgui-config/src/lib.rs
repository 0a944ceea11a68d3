//! Configuration loading for the GROMACS GUI Platform.
//! Reads gmxgui.toml from the current directory or the path in the GMXGUI_CONFIG env var.
//! Every field has a default, so a missing file yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub projects: ProjectsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_bind()       -> String { "127.0.0.1:3000".to_string() }
fn default_static_dir() -> String { "crates/gmxgui-web/static".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), static_dir: default_static_dir() }
    }
}

/// Health-check probe against the external simulation API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_endpoint()      -> String { "http://localhost:8000/".to_string() }
fn default_timeout_secs()  -> u64    { 5 }
fn default_interval_secs() -> u64    { 30 }

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl MonitorConfig {
    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
    pub fn interval(&self) -> Duration { Duration::from_secs(self.interval_secs.max(1)) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seconds a mock run stays in `running` before it is marked completed.
    #[serde(default = "default_run_delay_secs")]
    pub run_delay_secs: u64,
}

fn default_run_delay_secs() -> u64 { 5 }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { run_delay_secs: default_run_delay_secs() }
    }
}

impl SimulationConfig {
    pub fn run_delay(&self) -> Duration { Duration::from_secs(self.run_delay_secs) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    #[serde(default = "bool_true")]
    pub seed_demo: bool,
}

fn bool_true() -> bool { true }

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self { seed_demo: bool_true() }
    }
}


impl Config {
    /// Load configuration from gmxgui.toml.
    /// Checks GMXGUI_CONFIG env var first, then current directory. GMXGUI_BIND overrides the bind address.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("GMXGUI_CONFIG")
            .unwrap_or_else(|_| "gmxgui.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            tracing::info!("No config file at {}, using defaults", path);
            Self::default()
        };

        if let Ok(bind) = std::env::var("GMXGUI_BIND") {
            config.server.bind = bind;
        }
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
