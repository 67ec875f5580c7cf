pub mod backend;
pub mod config_io;
pub mod http;
pub mod local_sheet;
pub mod logging;
pub mod recovery;
pub mod state;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;

use crate::io::backend::SheetBackend;
use crate::model::BackendConfig;

/// Pick the backend for this run: the local sheet directory when offline,
/// the HTTP bridge otherwise.
pub fn open_backend(
    config: &BackendConfig,
    offline: bool,
    state_dir: &Path,
) -> Result<Box<dyn SheetBackend>, String> {
    if offline {
        return Ok(Box::new(local_sheet::LocalSheetBackend::new(state_dir)));
    }
    if !config.is_configured() {
        return Err(
            "no backend endpoint configured: set [backend] endpoint in riskdesk.toml or pass --offline"
                .to_string(),
        );
    }
    Ok(Box::new(http::HttpBackend::from_config(config)))
}
