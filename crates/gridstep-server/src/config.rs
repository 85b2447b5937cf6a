//! Server configuration loading

use std::path::Path;

use gridstep_core::MAX_GRID_SIZE;
use serde::Deserialize;

use crate::error::{Result, ServerError};

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Listener settings
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkConfig {
    /// Address to listen on (default: 127.0.0.1:8765)
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Concurrent clients served before new ones are turned away (default: 64)
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Longest accepted request line in bytes (default: 1 MiB)
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

/// Search limits applied to every session
#[derive(Clone, Debug, Deserialize)]
pub struct LimitsConfig {
    /// Largest grid side accepted by `start` (default: 200)
    #[serde(default = "default_max_grid_size")]
    pub max_grid_size: i32,
}

fn default_bind_address() -> String {
    "127.0.0.1:8765".to_string()
}

fn default_max_connections() -> usize {
    64
}

fn default_max_line_bytes() -> usize {
    1024 * 1024
}

fn default_max_grid_size() -> i32 {
    MAX_GRID_SIZE
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_connections: default_max_connections(),
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_grid_size: default_max_grid_size(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ServerError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse and check configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: ServerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_GRID_SIZE).contains(&self.limits.max_grid_size) {
            return Err(ServerError::Config(format!(
                "limits.max_grid_size must be between 1 and {}",
                MAX_GRID_SIZE
            )));
        }
        if self.network.max_connections == 0 {
            return Err(ServerError::Config(
                "network.max_connections must be positive".to_string(),
            ));
        }
        if self.network.max_line_bytes < 64 {
            return Err(ServerError::Config(
                "network.max_line_bytes must be at least 64".to_string(),
            ));
        }
        Ok(())
    }
}
