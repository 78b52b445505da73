//! Where journey keeps its files.
//!
//! Config lives in `~/.config/journey/journey.toml`; the session file and
//! logs live in the platform data dir. `JOURNEY_HOME` moves both under one
//! directory, which is what tests and throwaway profiles use.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use journey_runtime_config::CONFIG_FILE_NAME;

/// Override for the base directory of both config and state.
pub const HOME_ENV: &str = "JOURNEY_HOME";
/// File holding the current access key.
pub const SESSION_FILE_NAME: &str = "session.json";
/// TUI log file, written only when logging is enabled.
pub const TUI_LOG_FILE_NAME: &str = "journey-tui.log";

const APP_DIR: &str = "journey";

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("could not determine home directory")]
    NoHome,
}

pub type Result<T> = std::result::Result<T, PathError>;

/// Resolved locations for one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyPaths {
    pub config_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl JourneyPaths {
    /// Resolve from `JOURNEY_HOME` or the user's home directory.
    pub fn resolve() -> Result<Self> {
        if let Some(base) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::under(Path::new(&base)));
        }
        let dirs = BaseDirs::new().ok_or(PathError::NoHome)?;
        Ok(Self {
            config_dir: dirs.home_dir().join(".config").join(APP_DIR),
            state_dir: dirs.data_local_dir().join(APP_DIR),
        })
    }

    /// Everything under a single base directory.
    pub fn under(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            state_dir: base.join("state"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    pub fn session_path(&self) -> PathBuf {
        self.state_dir.join(SESSION_FILE_NAME)
    }

    pub fn tui_log_path(&self) -> PathBuf {
        self.state_dir.join(TUI_LOG_FILE_NAME)
    }
}
