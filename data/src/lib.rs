pub mod catalog;
pub mod chart;
pub mod config;
pub mod observation;
pub mod util;

pub use catalog::{SeriesCatalog, SeriesEntry};
pub use config::state::State;
pub use config::theme::Theme;
pub use observation::Observation;

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

pub const SAVED_STATE_PATH: &str = "saved-state.json";
const APP_DIR: &str = "llm-streamgraph";

#[derive(thiserror::Error, Debug)]
pub enum StateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid saved state: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Resolves a file inside the per-user data directory, falling back to the
/// working directory when the platform has none.
pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let base = dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);

    if let Some(path_name) = path_name {
        base.join(path_name)
    } else {
        base
    }
}

pub fn write_json_to_file(json: &str, file_name: &str) -> Result<(), StateError> {
    let path = data_path(Some(file_name));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&path)?;
    file.write_all(json.as_bytes())?;

    log::info!("Saved state to {}", path.display());
    Ok(())
}

pub fn read_from_file(file_name: &str) -> Result<State, StateError> {
    let path = data_path(Some(file_name));

    let mut file = File::open(&path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    Ok(serde_json::from_str(&contents)?)
}

/// Loads the saved state, or the defaults when there is none yet.
pub fn load_saved_state() -> State {
    match read_from_file(SAVED_STATE_PATH) {
        Ok(state) => state,
        Err(StateError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No saved state found, using defaults");
            State::default()
        }
        Err(err) => {
            log::error!("Failed to load saved state, using defaults: {err}");
            State::default()
        }
    }
}
