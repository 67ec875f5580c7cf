use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from riskdesk.toml. Every field has a default, so an
/// absent or empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Spreadsheet bridge URL. Empty means no remote backend is configured.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub spreadsheet_id: String,
    /// Sheet holding the work-step table
    #[serde(default = "default_sheet")]
    pub sheet: String,
    /// Request timeout for reads and writes, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            endpoint: String::new(),
            spreadsheet_id: String::new(),
            sheet: default_sheet(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

fn default_sheet() -> String {
    "work_steps".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Refuse to leave the work-step screen while edits are unsaved
    #[serde(default = "default_true")]
    pub lock_navigation_while_dirty: bool,
    /// Link to the risk-assessment manual
    #[serde(default = "default_manual_url")]
    pub manual_url: String,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            lock_navigation_while_dirty: true,
            manual_url: default_manual_url(),
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_manual_url() -> String {
    "https://drive.google.com/file/d/1VQb2pw5La9NPKjLDzKr_KnucMsRy_Wjl/view?usp=sharing"
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the log file, UI state, recovery log and offline sheets.
    /// Relative paths resolve against the directory holding riskdesk.toml.
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            state_dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> String {
    ".riskdesk".to_string()
}
