//! Configuration file I/O operations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::Config;

/// Project-local config location, relative to the working directory
pub const LOCAL_CONFIG_PATH: &str = ".ranch-academy/config.toml";

impl Config {
    /// Get the global config directory path (~/.ranch-academy/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ranch-academy")
    }

    /// Get the global config file path (~/.ranch-academy/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for: .ranch-academy/config.toml, then the global config
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let local_path = dir.join(LOCAL_CONFIG_PATH);
        if local_path.exists() {
            debug!("[ranch:config] Loading {}", local_path.display());
            return Self::from_file(&local_path);
        }

        let global_path = Self::global_config_path();
        if global_path.exists() {
            debug!("[ranch:config] Loading {}", global_path.display());
            return Self::from_file(&global_path);
        }

        Ok(Self::default())
    }

    /// Resolve the config for a CLI invocation: explicit path wins over lookup
    pub fn resolve(explicit: Option<&Path>, work_dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::from_dir(work_dir),
        }
    }

    /// SQLite database path, defaulting to ~/.ranch-academy/academy.db
    pub fn db_path(&self) -> PathBuf {
        if self.storage.db_path.trim().is_empty() {
            Self::global_config_dir().join("academy.db")
        } else {
            PathBuf::from(&self.storage.db_path)
        }
    }

    /// Address the HTTP API binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
