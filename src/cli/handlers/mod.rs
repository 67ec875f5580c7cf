mod init;
pub use init::cmd_init;

use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, Workspace};
use crate::io::recovery::{self, RecoveryCategory};
use crate::io::sync::{self, RemoteSync};
use crate::model::{Column, Department, RecordStore, sample_departments};
use crate::ops::filter::{FilterSelection, filter};
use crate::ops::session::{SaveOutcome, WorkStepSession};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Options shared by every command
struct Context<'a> {
    workspace: &'a Workspace,
    offline: bool,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, workspace: &Workspace) -> CmdResult {
    let ctx = Context {
        workspace,
        offline: cli.offline,
        json: cli.json,
    };

    match cli.command {
        None => Err("no command given (run without a subcommand for the TUI)".into()),
        Some(cmd) => match cmd {
            // Init is handled in main.rs before workspace discovery
            Commands::Init(args) => cmd_init(args),

            // Read commands
            Commands::List(args) => cmd_list(args, &ctx),
            Commands::Groups => cmd_groups(&ctx),
            Commands::Risk(args) => cmd_risk(args, &ctx),
            Commands::Manual => cmd_manual(&ctx),
            Commands::Recovery(args) => cmd_recovery(args, &ctx),

            // Write commands
            Commands::Add(args) => cmd_add(args, &ctx),
            Commands::Edit(args) => cmd_edit(args, &ctx),
            Commands::Remove(args) => cmd_remove(args, &ctx),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the workspace from `-c` or by walking up from the current directory
pub fn load_workspace_cwd(config: Option<&str>) -> Result<Workspace, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    Ok(config_io::load_workspace(config.map(Path::new), &cwd)?)
}

fn open_sync(ctx: &Context) -> Result<RemoteSync, Box<dyn std::error::Error>> {
    let config = &ctx.workspace.config.backend;
    let backend = crate::io::open_backend(config, ctx.offline, &ctx.workspace.state_dir())?;
    Ok(RemoteSync::new(backend, config.sheet.clone()))
}

/// Load strictly: unlike the TUI, a script must not act on an empty
/// stand-in table, or the next save would wipe the sheet.
fn load_session(sync: &RemoteSync) -> Result<WorkStepSession, Box<dyn std::error::Error>> {
    let records = sync
        .try_load()
        .map_err(|e| format!("could not load work steps from {}: {}", sync.describe(), e))?;
    Ok(WorkStepSession::new(RecordStore::from_records(records)))
}

/// Convert a 1-based CLI row number into a view index
fn row_index(row: usize, view_len: usize) -> Result<usize, String> {
    if row == 0 {
        return Err("row numbers start at 1".to_string());
    }
    if row > view_len {
        return Err(format!("row {} not found ({} rows shown)", row, view_len));
    }
    Ok(row - 1)
}

fn find_department<'a>(departments: &'a [Department], name: &str) -> Result<&'a Department, String> {
    departments
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| {
            let names: Vec<&str> = departments.iter().map(|d| d.name.as_str()).collect();
            format!("unknown department: {} (choose from {})", name, names.join(", "))
        })
}

/// Save the session, keeping the payload in the recovery log on failure
fn save_session(session: &mut WorkStepSession, sync: &RemoteSync, ctx: &Context) -> CmdResult {
    match session.on_save(sync) {
        SaveOutcome::NothingToSave => {
            println!("Nothing to save");
            Ok(())
        }
        SaveOutcome::Saved { message, warning } => {
            if let Some(msg) = message {
                tracing::debug!(message = %msg, "backend acknowledged save");
            }
            if let Some(w) = warning {
                eprintln!("warning: {}", w);
            }
            Ok(())
        }
        SaveOutcome::Failed { error } => {
            let state_dir = ctx.workspace.state_dir();
            recovery::log_unsaved_table(
                &state_dir,
                RecoveryCategory::SaveFailed,
                sync.sheet(),
                &error,
                &sync::to_sheet_rows(session.store()),
            );
            Err(format!(
                "save failed: {} (the unsaved table was kept in {})",
                error,
                recovery::recovery_log_path(&state_dir).display()
            )
            .into())
        }
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, ctx: &Context) -> CmdResult {
    let sync = open_sync(ctx)?;
    let session = load_session(&sync)?;
    let selection = FilterSelection::from_arg(args.group.as_deref());
    let rows = filter(session.store(), &selection);

    if ctx.json {
        let out = WorkStepListJson {
            filter: selection.to_string(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(i, r)| work_step_to_json(i, r))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_work_steps(&rows) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_groups(ctx: &Context) -> CmdResult {
    let sync = open_sync(ctx)?;
    let session = load_session(&sync)?;
    let groups: Vec<GroupJson> = session
        .filter_options()
        .into_iter()
        .map(|g| {
            let rows = filter(session.store(), &FilterSelection::Group(g.clone())).len();
            GroupJson { group: g, rows }
        })
        .collect();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        for g in &groups {
            println!("{}  ({} rows)", g.group, g.rows);
        }
    }
    Ok(())
}

fn cmd_risk(args: RiskArgs, ctx: &Context) -> CmdResult {
    let departments = sample_departments();
    match args.department {
        None => {
            if ctx.json {
                let out: Vec<DepartmentJson> = departments
                    .iter()
                    .map(|d| department_to_json(d, false))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for d in &departments {
                    println!("{}", d.name);
                }
            }
        }
        Some(name) => {
            let department = find_department(&departments, &name)?;
            if ctx.json {
                let out = department_to_json(department, true);
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for line in format_risk_table(department) {
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}

fn cmd_manual(ctx: &Context) -> CmdResult {
    let url = &ctx.workspace.config.ui.manual_url;
    if ctx.json {
        println!("{}", serde_json::json!({ "url": url }));
    } else {
        println!("{}", url);
    }
    Ok(())
}

fn cmd_recovery(args: RecoveryArgs, ctx: &Context) -> CmdResult {
    let state_dir = ctx.workspace.state_dir();
    if args.prune {
        let removed = recovery::prune_recovery(&state_dir, None)?;
        println!("Pruned {} recovery entries", removed);
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(&state_dir, Some(args.limit));
    if ctx.json {
        let out: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if entries.is_empty() {
        println!("No recovery entries");
    } else {
        print!("{}", format_recovery_entries(&entries));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, ctx: &Context) -> CmdResult {
    if args.group.trim().is_empty() {
        return Err("group cannot be empty".into());
    }
    let sync = open_sync(ctx)?;
    let mut session = load_session(&sync)?;

    let idx = session.on_add_row();
    session.on_cell_edit(idx, Column::Group, args.group.clone())?;
    session.on_cell_edit(idx, Column::Activity, args.activity.clone())?;
    session.on_cell_edit(idx, Column::Position, args.position.clone())?;
    save_session(&mut session, &sync, ctx)?;

    tracing::info!(group = %args.group, "added work step");
    println!("Added: {}  {}  {}", args.group, args.activity, args.position);
    Ok(())
}

fn cmd_edit(args: EditArgs, ctx: &Context) -> CmdResult {
    let changes: Vec<(Column, String)> = [
        (Column::Group, args.group),
        (Column::Activity, args.activity),
        (Column::Position, args.position),
    ]
    .into_iter()
    .filter_map(|(col, value)| value.map(|v| (col, v)))
    .collect();
    if changes.is_empty() {
        return Err("nothing to change: pass --group, --activity or --position".into());
    }
    if let Some((_, g)) = changes.iter().find(|(c, _)| *c == Column::Group)
        && g.trim().is_empty()
    {
        return Err("group cannot be empty (use `remove` to delete a row)".into());
    }

    let sync = open_sync(ctx)?;
    let mut session = load_session(&sync)?;
    session.on_filter_change(FilterSelection::from_arg(args.filter.as_deref()));
    let idx = row_index(args.row, session.view().len())?;

    let mut changed = false;
    for (column, value) in changes {
        changed |= session.on_cell_edit(idx, column, value)?;
    }
    if !changed {
        println!("Row {} already has those values", args.row);
        return Ok(());
    }
    save_session(&mut session, &sync, ctx)?;

    tracing::info!(row = args.row, "edited work step");
    println!("Updated row {}", args.row);
    Ok(())
}

fn cmd_remove(args: RemoveArgs, ctx: &Context) -> CmdResult {
    let sync = open_sync(ctx)?;
    let mut session = load_session(&sync)?;
    session.on_filter_change(FilterSelection::from_arg(args.filter.as_deref()));
    let idx = row_index(args.row, session.view().len())?;

    let removed = session.on_delete_row(idx)?;
    save_session(&mut session, &sync, ctx)?;

    tracing::info!(group = %removed.group, "removed work step");
    println!(
        "Removed: {}  {}  {}",
        removed.group, removed.activity, removed.position
    );
    Ok(())
}
