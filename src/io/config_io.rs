use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

pub const CONFIG_FILE: &str = "riskdesk.toml";

/// Commented template written by `riskdesk init`
const CONFIG_TEMPLATE: &str = r##"# riskdesk configuration

[backend]
# Spreadsheet bridge URL. Leave empty and pass --offline to work on local sheets.
endpoint = ""
spreadsheet_id = ""
# Sheet holding the work-step table
sheet = "work_steps"
# Seconds to wait for a read or write before giving up
timeout_secs = 60

[ui]
# Refuse to leave the work-step screen while edits are unsaved
lock_navigation_while_dirty = true
manual_url = "https://drive.google.com/file/d/1VQb2pw5La9NPKjLDzKr_KnucMsRy_Wjl/view?usp=sharing"

[ui.colors]
# background = "#0C001B"

[storage]
# Log file, UI state, recovery log and offline sheets live here
state_dir = ".riskdesk"
"##;

/// Error type for configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not edit config: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Resolved configuration plus where it came from
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory that relative paths in the config resolve against
    pub root: PathBuf,
    /// The config file, if one was found
    pub config_path: Option<PathBuf>,
    pub config: AppConfig,
}

impl Workspace {
    /// Defaults rooted at `root`, with no config file
    pub fn with_defaults(root: &Path) -> Self {
        Workspace {
            root: root.to_path_buf(),
            config_path: None,
            config: AppConfig::default(),
        }
    }

    pub fn state_dir(&self) -> PathBuf {
        let dir = Path::new(&self.config.storage.state_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        }
    }
}

/// Walk up from `start` looking for riskdesk.toml
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Resolve the workspace: an explicit config path wins, otherwise search
/// upward from `cwd`, otherwise fall back to defaults rooted at `cwd`.
pub fn load_workspace(explicit: Option<&Path>, cwd: &Path) -> Result<Workspace, ConfigError> {
    let path = match explicit {
        Some(p) => Some(if p.is_absolute() { p.to_path_buf() } else { cwd.join(p) }),
        None => discover_config(cwd),
    };
    let Some(path) = path else {
        return Ok(Workspace::with_defaults(cwd));
    };
    let config = read_config(&path)?;
    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());
    Ok(Workspace {
        root,
        config_path: Some(path),
        config,
    })
}

/// Render the config template with the given backend settings filled in,
/// preserving the template's comments.
pub fn render_config_template(
    endpoint: Option<&str>,
    spreadsheet_id: Option<&str>,
) -> Result<String, ConfigError> {
    let mut doc: toml_edit::DocumentMut = CONFIG_TEMPLATE.parse()?;
    if let Some(endpoint) = endpoint {
        doc["backend"]["endpoint"] = toml_edit::value(endpoint);
    }
    if let Some(id) = spreadsheet_id {
        doc["backend"]["spreadsheet_id"] = toml_edit::value(id);
    }
    Ok(doc.to_string())
}

/// Write a fresh riskdesk.toml into `dir`
pub fn write_default_config(
    dir: &Path,
    endpoint: Option<&str>,
    spreadsheet_id: Option<&str>,
    force: bool,
) -> Result<PathBuf, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path));
    }
    let content = render_config_template(endpoint, spreadsheet_id)?;
    fs::write(&path, content)?;
    Ok(path)
}
