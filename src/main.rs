use clap::Parser;
use riskdesk::cli::commands::{Cli, Commands};
use riskdesk::cli::handlers;
use riskdesk::io::logging;

fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Init(args)) = cli.command {
        // Init is handled before workspace discovery
        if let Err(e) = handlers::cmd_init(args) {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let workspace = match handlers::load_workspace_cwd(cli.config.as_deref()) {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    logging::init_logging(&workspace.state_dir());

    let result = match cli.command {
        // No subcommand → launch TUI
        None => riskdesk::tui::run(workspace, cli.offline),
        Some(_) => handlers::dispatch(cli, &workspace),
    };
    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
