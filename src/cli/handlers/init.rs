use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};

/// The endpoint must be an absolute http(s) URL
fn validate_endpoint(endpoint: &str) -> Result<(), String> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err("endpoint cannot be empty".to_string());
    }
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(format!(
            "invalid endpoint \"{}\": expected an http:// or https:// URL",
            endpoint
        ));
    }
    Ok(())
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;

    if let Some(endpoint) = args.endpoint.as_deref() {
        validate_endpoint(endpoint)?;
    }

    // Warn about a config further up that this one will shadow
    if let Some(parent) = cwd.parent()
        && let Some(existing) = config_io::discover_config(parent)
    {
        eprintln!("Note: found {} higher up", existing.display());
        eprintln!("Creating ./{} which takes precedence here", CONFIG_FILE);
    }

    let path = config_io::write_default_config(
        &cwd,
        args.endpoint.as_deref().map(str::trim),
        args.spreadsheet_id.as_deref(),
        args.force,
    )?;
    tracing::info!(path = %path.display(), "wrote config");

    println!("Wrote {}", path.display());
    if args.endpoint.is_none() {
        println!("  set [backend] endpoint, or run with --offline to use local sheets");
    }
    Ok(())
}
