//! Editor configuration.
//!
//! Loaded from an optional JSON file, then overridden by `EASEL_*`
//! environment variables. Every field has a default so an empty file (or
//! no file at all) yields a working demo-mode setup.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable pointing at a JSON config file.
pub const CONFIG_ENV_VAR: &str = "EASEL_CONFIG";
pub const REMOTE_API_KEY_ENV_VAR: &str = "EASEL_REMOTE_API_KEY";
pub const REMOTE_PROJECT_ID_ENV_VAR: &str = "EASEL_REMOTE_PROJECT_ID";
pub const LOCAL_DIR_ENV_VAR: &str = "EASEL_LOCAL_DIR";
pub const SAVE_DEBOUNCE_ENV_VAR: &str = "EASEL_SAVE_DEBOUNCE_MS";
pub const HISTORY_LIMIT_ENV_VAR: &str = "EASEL_HISTORY_LIMIT";

/// Placeholder credentials shipped with demo builds.
pub const DEMO_API_KEY: &str = "demo-api-key";
pub const DEMO_PROJECT_ID: &str = "demo-project-id";

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 1000;

/// Drawing surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub grid_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: "white".into(),
            grid_size: 20.0,
        }
    }
}

/// Remote document store credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub api_key: String,
    pub project_id: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_key: DEMO_API_KEY.into(),
            project_id: DEMO_PROJECT_ID.into(),
        }
    }
}

impl RemoteConfig {
    /// False while either credential is still the demo placeholder.
    pub fn is_configured(&self) -> bool {
        self.api_key != DEMO_API_KEY && self.project_id != DEMO_PROJECT_ID
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas: CanvasConfig,
    /// Maximum number of snapshots kept for undo.
    pub history_limit: usize,
    /// Quiet period before an autosave fires.
    pub save_debounce_ms: u64,
    pub remote: RemoteConfig,
    /// Directory backing the local fallback store. `None` keeps it in memory.
    pub local_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            remote: RemoteConfig::default(),
            local_dir: None,
        }
    }
}

impl EditorConfig {
    /// Load from `EASEL_CONFIG` (if set) and apply environment overrides.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => load_config(&path)?,
            Err(_) => EditorConfig::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `EASEL_*` overrides looked up through `lookup`, then validate.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup(REMOTE_API_KEY_ENV_VAR) {
            self.remote.api_key = v;
        }
        if let Some(v) = lookup(REMOTE_PROJECT_ID_ENV_VAR) {
            self.remote.project_id = v;
        }
        if let Some(v) = lookup(LOCAL_DIR_ENV_VAR) {
            self.local_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(SAVE_DEBOUNCE_ENV_VAR) {
            self.save_debounce_ms = parse_number(SAVE_DEBOUNCE_ENV_VAR, &v)?;
        }
        if let Some(v) = lookup(HISTORY_LIMIT_ENV_VAR) {
            self.history_limit = parse_number(HISTORY_LIMIT_ENV_VAR, &v)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::ZeroHistoryLimit);
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::InvalidCanvasSize {
                width: self.canvas.width,
                height: self.canvas.height,
            });
        }
        if !(self.canvas.grid_size.is_finite() && self.canvas.grid_size > 0.0) {
            return Err(ConfigError::InvalidGridSize(self.canvas.grid_size));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("history limit must be at least 1")]
    ZeroHistoryLimit,

    #[error("canvas size must be non-zero, got {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },

    #[error("grid size must be a positive number, got {0}")]
    InvalidGridSize(f64),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Load a config file. Missing fields take their defaults.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<EditorConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    let config: EditorConfig = serde_json::from_str(&data).context("parse config json")?;
    config.validate()?;
    Ok(config)
}

/// Write a config file as pretty JSON.
pub fn save_config(path: impl AsRef<Path>, config: &EditorConfig) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(config).context("serialize config to json")?;
    fs::write(path, json).with_context(|| format!("write config file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_demo_mode() {
        let config = EditorConfig::default();
        assert!(!config.remote.is_configured());
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.save_debounce_ms, 1000);
        assert_eq!((config.canvas.width, config.canvas.height), (800, 600));
    }

    #[test]
    fn test_overrides_configure_remote() {
        let env: HashMap<&str, &str> = [
            (REMOTE_API_KEY_ENV_VAR, "real-key"),
            (REMOTE_PROJECT_ID_ENV_VAR, "real-project"),
            (SAVE_DEBOUNCE_ENV_VAR, "250"),
        ]
        .into_iter()
        .collect();

        let mut config = EditorConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert!(config.remote.is_configured());
        assert_eq!(config.save_debounce_ms, 250);
    }

    #[test]
    fn test_only_one_real_credential_is_not_configured() {
        let remote = RemoteConfig {
            api_key: "real-key".into(),
            ..RemoteConfig::default()
        };
        assert!(!remote.is_configured());
    }

    #[test]
    fn test_bad_override_rejected() {
        let mut config = EditorConfig::default();
        let err = config
            .apply_overrides(|k| (k == HISTORY_LIMIT_ENV_VAR).then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = config
            .apply_overrides(|k| (k == HISTORY_LIMIT_ENV_VAR).then(|| "0".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroHistoryLimit));
    }

    #[test]
    fn test_config_file_roundtrip_with_partial_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("easel.json");

        let mut config = EditorConfig::default();
        config.canvas.grid_size = 10.0;
        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);

        fs::write(&path, r#"{"history_limit": 5}"#).unwrap();
        let partial = load_config(&path).unwrap();
        assert_eq!(partial.history_limit, 5);
        assert_eq!(partial.save_debounce_ms, 1000);
    }
}
