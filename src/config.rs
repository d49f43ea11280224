//! Configuration Management
//!
//! Handles persistent configuration storage for wsk and resolves the
//! read-only [`ClientConfig`] snapshot handed to the commands.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Namespace used when nothing else is configured
pub const DEFAULT_NAMESPACE: &str = "_";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Platform API host, with or without a scheme
    #[serde(default)]
    pub apihost: Option<String>,
    /// Authorization key (`uuid:key`)
    #[serde(default)]
    pub auth: Option<String>,
    /// Default namespace
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Values given on the command line (or via their environment variables)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub apihost: Option<String>,
    pub auth: Option<String>,
    pub namespace: Option<String>,
    pub insecure: bool,
}

/// Immutable process-wide configuration consumed by the commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub namespace: String,
    pub host: String,
    pub auth_token: String,
    pub insecure: bool,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("wsk").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Resolve the effective settings (CLI/env > config file > default)
    pub fn resolve(&self, overrides: &Overrides) -> ClientConfig {
        ClientConfig {
            namespace: pick(&overrides.namespace, &self.namespace)
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            host: pick(&overrides.apihost, &self.apihost).unwrap_or_default(),
            auth_token: pick(&overrides.auth, &self.auth).unwrap_or_default(),
            insecure: overrides.insecure,
        }
    }
}

fn pick(primary: &Option<String>, fallback: &Option<String>) -> Option<String> {
    primary
        .iter()
        .chain(fallback.iter())
        .find(|v| !v.is_empty())
        .cloned()
}

impl ClientConfig {
    /// Host without any scheme prefix
    pub fn host_authority(&self) -> &str {
        self.host
            .strip_prefix("https://")
            .or_else(|| self.host.strip_prefix("http://"))
            .unwrap_or(&self.host)
            .trim_end_matches('/')
    }

    /// Root of the platform REST API, e.g. `https://host/api/v1/`
    pub fn api_base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}/api/v1/", host)
        } else {
            format!("https://{}/api/v1/", host)
        }
    }
}
