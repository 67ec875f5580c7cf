use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "riskdesk", about = concat!("riskdesk v", env!("CARGO_PKG_VERSION"), " - occupational risk-assessment dashboard"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Work on local sheets under the state directory instead of the backend
    #[arg(long, global = true)]
    pub offline: bool,

    /// Use this config file instead of discovering riskdesk.toml
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default riskdesk.toml in the current directory
    Init(InitArgs),
    /// Print the work-step table
    List(ListArgs),
    /// List the distinct work-step groups
    Groups,
    /// Add a work step and save
    Add(AddArgs),
    /// Edit a work step and save
    Edit(EditArgs),
    /// Remove a work step and save
    Remove(RemoveArgs),
    /// List departments, or show one department's risk table
    Risk(RiskArgs),
    /// Print the risk-assessment manual link
    Manual,
    /// Show unsaved tables captured after failed saves
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Backend endpoint to write into the new config
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Spreadsheet id to write into the new config
    #[arg(long = "spreadsheet-id")]
    pub spreadsheet_id: Option<String>,
    /// Overwrite an existing riskdesk.toml
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only rows of this group
    #[arg(long)]
    pub group: Option<String>,
}

#[derive(Args)]
pub struct RiskArgs {
    /// Department to show (default: list departments)
    pub department: Option<String>,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Number of entries to show (most recent first)
    #[arg(long, default_value = "10")]
    pub limit: usize,
    /// Delete entries older than 30 days instead of showing them
    #[arg(long)]
    pub prune: bool,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Group key (e.g. T001)
    pub group: String,
    /// Work step / activity
    pub activity: String,
    /// Position performing the step
    pub position: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Row number in the (filtered) table, starting at 1
    pub row: usize,
    /// New group
    #[arg(long)]
    pub group: Option<String>,
    /// New activity
    #[arg(long)]
    pub activity: Option<String>,
    /// New position
    #[arg(long)]
    pub position: Option<String>,
    /// Count rows within this group only
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Row number in the (filtered) table, starting at 1
    pub row: usize,
    /// Count rows within this group only
    #[arg(long)]
    pub filter: Option<String>,
}
