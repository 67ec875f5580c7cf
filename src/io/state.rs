use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted TUI state (written to .state.json).
///
/// The work-step filter is deliberately absent: it resets on every load.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UiState {
    /// Which screen is showing ("manual", "worksteps", "risk")
    pub screen: String,
    /// Department selected on the risk screen
    #[serde(default)]
    pub risk_department: Option<String>,
}

/// Read .state.json from the state directory
pub fn read_ui_state(state_dir: &Path) -> Option<UiState> {
    let path = state_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the state directory
pub fn write_ui_state(state_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    fs::create_dir_all(state_dir)?;
    let path = state_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
