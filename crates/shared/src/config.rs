//! Configuration types for akbo

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{AkboError, Result};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "akbo.yaml";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application configuration (akbo.yaml)
///
/// ```yaml
/// server:
///   host: 0.0.0.0
///   port: 8080
/// log_level: debug
/// tasks:
///   unit-test: [cargo, nextest, run]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,

    /// Default tracing filter, used when RUST_LOG is unset
    pub log_level: String,

    /// Task overrides: alias -> [program, args...]
    pub tasks: BTreeMap<String, Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log_level: "info".to_string(),
            tasks: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Without one, `akbo.yaml` in the working
    /// directory is used when present. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `AKBO_HOST`, `AKBO_PORT` and `AKBO_LOG` overrides
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("AKBO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("AKBO_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| AkboError::Config(format!("AKBO_PORT is not a valid port: {}", port)))?;
        }
        if let Some(level) = lookup("AKBO_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    fn check(&self) -> Result<()> {
        for (alias, command) in &self.tasks {
            if command.first().map_or(true, |program| program.trim().is_empty()) {
                return Err(AkboError::Config(format!(
                    "task '{}' must name a program to run",
                    alias
                )));
            }
        }
        Ok(())
    }
}
