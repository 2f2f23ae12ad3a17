// Application settings
// Loaded from ~/.config/dss/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dss_evaluator_client::EvaluatorConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Remote evaluator
    #[serde(rename = "evaluator.baseUrl")]
    pub base_url: String,

    #[serde(rename = "evaluator.endpointPath")]
    pub endpoint_path: String,

    #[serde(rename = "evaluator.healthPath")]
    pub health_path: String,

    #[serde(rename = "evaluator.timeoutSecs")]
    pub timeout_secs: u64,

    // Logging (RUST_LOG wins when set)
    #[serde(rename = "log.filter")]
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        let evaluator = EvaluatorConfig::default();
        Self {
            base_url: evaluator.base_url,
            endpoint_path: evaluator.endpoint_path,
            health_path: evaluator.health_path,
            timeout_secs: evaluator.timeout.as_secs(),
            log_filter: "warn".to_string(),
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Remote evaluator
    "evaluator.baseUrl": "http://localhost:8080",
    "evaluator.endpointPath": "/api/dss/evaluar",
    "evaluator.healthPath": "/api/health",
    "evaluator.timeoutSecs": 60,

    // Log filter (tracing EnvFilter syntax); RUST_LOG overrides it
    "log.filter": "warn"
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dss")
            .join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. Missing file → defaults; unreadable or
    /// malformed file → defaults plus a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        }
        match Self::try_load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "using default settings");
                Self::default()
            }
        }
    }

    /// Strict variant of [`Settings::load_from`].
    pub fn try_load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse settings JSON, ignoring lines that start with `//`.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Write the commented default file unless one already exists
    pub fn create_default_file(path: &Path) -> Result<bool, SettingsError> {
        if path.exists() {
            return Ok(false);
        }
        let write_err = |source| SettingsError::Write { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, DEFAULT_FILE).map_err(write_err)?;
        Ok(true)
    }

    /// Client settings for the configured evaluator
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            base_url: self.base_url.clone(),
            endpoint_path: self.endpoint_path.clone(),
            health_path: self.health_path.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
