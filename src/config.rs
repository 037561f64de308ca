//! Application configuration.
//!
//! Loaded from a small YAML file:
//!
//! ```yaml
//! bind_addr: 0.0.0.0:8080
//! seed_file: config/contacts.yaml
//! ```
//!
//! CLI flags override file values, and everything has a default, so the
//! file is optional.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Optional YAML file of contacts loaded into the store at startup.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            seed_file: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
