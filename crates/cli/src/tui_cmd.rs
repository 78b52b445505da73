use anyhow::Result;

use crate::config::{load_config, open_session, resolve_paths};

/// Launch the interactive journal. Logs go to a file (see `JOURNEY_LOG`)
/// since the terminal belongs to the UI.
pub fn run() -> Result<()> {
    let paths = resolve_paths()?;
    let config = load_config(&paths)?;
    journey_tui::init_file_logging(&paths.tui_log_path())?;
    let session = open_session(&paths, &config)?;
    journey_tui::run(session, &config.ui)
}
