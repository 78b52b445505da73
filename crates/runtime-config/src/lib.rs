//! Shared CLI/TUI configuration types.
//!
//! Both `journey` and `journey-tui` read and write `journey.toml` using these
//! types. Only backend coordinates and a couple of UI preferences live here;
//! the access key itself is session state and is stored separately.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Canonical config file name used by cli/tui.
pub const CONFIG_FILE_NAME: &str = "journey.toml";

/// Environment override for [`BackendSettings::url`].
pub const BACKEND_URL_ENV: &str = "JOURNEY_BACKEND_URL";
/// Environment override for [`BackendSettings::anon_key`].
pub const ANON_KEY_ENV: &str = "JOURNEY_ANON_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config at {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level configuration (persisted as `journey.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct JourneyConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

/// Coordinates of the hosted table store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSettings {
    #[serde(default)]
    pub url: String,
    /// Public project key sent as `apikey`. Not a user credential.
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiSettings {
    /// Ask before `journey sign-out` clears the stored key.
    #[serde(default = "default_true")]
    pub confirm_sign_out: bool,
    /// chrono format string for entry timestamps.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            confirm_sign_out: true,
            date_format: default_date_format(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_true() -> bool {
    true
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

/// True while the backend cannot be reached because url or anon key is blank.
pub fn needs_setup(config: &JourneyConfig) -> bool {
    config.backend.url.trim().is_empty() || config.backend.anon_key.trim().is_empty()
}

/// Apply `JOURNEY_BACKEND_URL` / `JOURNEY_ANON_KEY` on top of file values.
pub fn apply_env_overrides(config: &mut JourneyConfig) -> bool {
    apply_overrides(
        config,
        std::env::var(BACKEND_URL_ENV).ok(),
        std::env::var(ANON_KEY_ENV).ok(),
    )
}

fn apply_overrides(
    config: &mut JourneyConfig,
    url: Option<String>,
    anon_key: Option<String>,
) -> bool {
    let mut changed = false;
    if let Some(url) = url.filter(|v| !v.trim().is_empty()) {
        config.backend.url = url.trim().to_string();
        changed = true;
    }
    if let Some(key) = anon_key.filter(|v| !v.trim().is_empty()) {
        config.backend.anon_key = key.trim().to_string();
        changed = true;
    }
    changed
}

/// Load config from `path`, returning defaults if the file does not exist.
pub fn load_from(path: &Path) -> Result<JourneyConfig, ConfigError> {
    if !path.exists() {
        return Ok(JourneyConfig::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Write config to `path`, creating the parent directory.
pub fn save_to(path: &Path, config: &JourneyConfig) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(write_err)
}
