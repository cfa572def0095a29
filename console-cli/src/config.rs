//! CLI configuration: a small TOML file plus flag/env overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the resource API, including the `/api` prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Where the session snapshot is persisted.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            session_file: None,
        }
    }
}

impl AppConfig {
    /// Load from an explicit path, or the default location; a missing file
    /// yields the defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)?;
        toml::from_str(&raw)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }

    fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("No config directory on this platform".to_string()))?;
        Ok(dir.join("tgc").join("config.toml"))
    }

    /// Session file: configured path, or the platform data directory.
    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.session_file {
            return Ok(path.clone());
        }
        let dir = dirs::data_dir()
            .ok_or_else(|| CliError::Config("No data directory on this platform".to_string()))?;
        Ok(dir.join("tgc").join("session.json"))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Serialize config: {e}")))?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load(Some("/nonexistent/tgc.toml")).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.session_file.is_none());
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = std::env::temp_dir().join(format!("tgc-test-{}", std::process::id()));
        let path = dir.join("config.toml");

        let config = AppConfig {
            api_url: "https://console.example.com/api".to_string(),
            session_file: Some(PathBuf::from("/tmp/session.json")),
        };
        config.write_to(&path).unwrap();

        let loaded = AppConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.api_url, config.api_url);
        assert_eq!(loaded.session_file, config.session_file);

        std::fs::remove_dir_all(&dir).ok();
    }
}
