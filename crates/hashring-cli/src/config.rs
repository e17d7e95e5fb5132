//! TOML configuration for the `hashring` CLI.
//!
//! Every section is optional; a missing file or table falls back to the
//! ring defaults (100 replicas, MD5, no nodes) and `info` logging.

use std::path::Path;

use anyhow::Context;
use hashring::{HashAlgorithm, RingConfig};
use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Ring placement settings and seed nodes.
    pub ring: RingConfig,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("failed to read {}", p.display()))?;
                Self::from_toml(&content)
                    .with_context(|| format!("invalid config {}", p.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string.
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Apply command-line overrides on top of the file values.
    ///
    /// Nodes given on the command line replace the configured list.
    pub fn apply_overrides(
        &mut self,
        nodes: Vec<String>,
        replicas: Option<usize>,
        hasher: Option<HashAlgorithm>,
    ) {
        if !nodes.is_empty() {
            self.ring.nodes = nodes;
        }
        if let Some(r) = replicas {
            self.ring.replicas = r;
        }
        if let Some(h) = hasher {
            self.ring.hasher = h;
        }
    }
}
