use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "RISKDESK_LOG";

pub fn log_path(state_dir: &Path) -> PathBuf {
    state_dir.join("riskdesk.log")
}

/// Route `tracing` events to `<state_dir>/riskdesk.log`.
///
/// The terminal belongs to the TUI, so nothing is written to stdout or
/// stderr. Returns false (and installs nothing) if the file can't be opened
/// or a subscriber is already set.
pub fn init_logging(state_dir: &Path) -> bool {
    if fs::create_dir_all(state_dir).is_err() {
        return false;
    }
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(state_dir))
    {
        Ok(f) => f,
        Err(_) => return false,
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn log_file_lives_in_state_dir() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(log_path(tmp.path()), tmp.path().join("riskdesk.log"));
    }

    #[test]
    fn unusable_state_dir_installs_nothing() {
        let tmp = TempDir::new().unwrap();
        let blocked = tmp.path().join("state");
        fs::write(&blocked, "a file, not a directory").unwrap();
        assert!(!init_logging(&blocked));
        assert!(!log_path(&blocked).exists());
    }
}
