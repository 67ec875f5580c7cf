use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::Workspace;
use crate::io::recovery::{self, RecoveryCategory};
use crate::io::sync::{self, RemoteSync};
use crate::model::{Column, Department, RecordStore, WorkStepRecord, sample_departments};
use crate::ops::filter::cycle_selection;
use crate::ops::session::{SaveOutcome, WorkStepSession, column_at};

use super::input;
use super::render;
use super::theme::Theme;

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Manual,
    WorkSteps,
    Risk,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Manual, Screen::WorkSteps, Screen::Risk];

    pub fn label(self) -> &'static str {
        match self {
            Screen::Manual => "Manual",
            Screen::WorkSteps => "Work steps",
            Screen::Risk => "Risk assessment",
        }
    }

    /// Key stored in .state.json
    pub fn key(self) -> &'static str {
        match self {
            Screen::Manual => "manual",
            Screen::WorkSteps => "worksteps",
            Screen::Risk => "risk",
        }
    }

    pub fn from_key(key: &str) -> Option<Screen> {
        Screen::ALL.into_iter().find(|s| s.key() == key)
    }

    fn index(self) -> usize {
        Screen::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Screen {
        Screen::ALL[(self.index() + 1) % Screen::ALL.len()]
    }

    pub fn prev(self) -> Screen {
        Screen::ALL[(self.index() + Screen::ALL.len() - 1) % Screen::ALL.len()]
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Edit,
    Confirm,
}

/// What a pending y/n prompt will do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Drop unsaved edits and reload from the backend
    Reload,
    /// Quit with unsaved edits
    Quit,
    /// Delete the row at this view index
    DeleteRow { row: usize },
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

/// Main application state
pub struct App {
    pub workspace: Workspace,
    /// None when no backend could be opened; the table stays empty and
    /// saving reports why.
    pub sync: Option<RemoteSync>,
    pub backend_error: Option<String>,
    pub session: WorkStepSession,
    pub screen: Screen,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor into the work-step view
    pub cursor_row: usize,
    pub cursor_col: usize,
    /// First visible table row
    pub scroll_offset: usize,
    /// Cell text being edited
    pub edit_buffer: String,
    /// Byte offset of the edit cursor in `edit_buffer`
    pub edit_cursor: usize,
    pub confirm_state: Option<ConfirmState>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub show_help: bool,
    pub departments: Vec<Department>,
    /// Cursor in the department list
    pub risk_cursor: usize,
    /// Department whose table is shown; none until the user picks one
    pub risk_selected: Option<usize>,
}

impl App {
    pub fn new(workspace: Workspace, sync: Option<RemoteSync>, session: WorkStepSession) -> Self {
        let theme = Theme::from_config(&workspace.config.ui);
        App {
            workspace,
            sync,
            backend_error: None,
            session,
            screen: Screen::Manual,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            cursor_row: 0,
            cursor_col: 0,
            scroll_offset: 0,
            edit_buffer: String::new(),
            edit_cursor: 0,
            confirm_state: None,
            status_message: None,
            status_is_error: false,
            show_help: false,
            departments: sample_departments(),
            risk_cursor: 0,
            risk_selected: None,
        }
    }

    /// Open the backend and load the work-step table. Never fails: problems
    /// end up in the status row.
    pub fn load(workspace: Workspace, offline: bool) -> Self {
        let state_dir = workspace.state_dir();
        let backend = crate::io::open_backend(&workspace.config.backend, offline, &state_dir);
        match backend {
            Ok(backend) => {
                let sync = RemoteSync::new(backend, workspace.config.backend.sheet.clone());
                tracing::info!(backend = %sync.describe(), "opening work steps");
                let (session, warning) = WorkStepSession::load(&sync);
                let mut app = App::new(workspace, Some(sync), session);
                if let Some(w) = warning {
                    app.set_error(w);
                }
                app
            }
            Err(e) => {
                tracing::warn!(error = %e, "no backend available");
                let mut app = App::new(workspace, None, WorkStepSession::new(RecordStore::new()));
                app.set_error(e.clone());
                app.backend_error = Some(e);
                app
            }
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    pub fn lock_navigation(&self) -> bool {
        self.workspace.config.ui.lock_navigation_while_dirty
    }

    /// The rows currently shown on the work-step screen
    pub fn view(&self) -> Vec<WorkStepRecord> {
        self.session.view()
    }

    pub fn current_column(&self) -> Column {
        column_at(self.cursor_col).unwrap_or(Column::Group)
    }

    /// Keep the cursor inside the view after it changes size
    pub fn clamp_cursor(&mut self) {
        let len = self.view().len();
        self.cursor_row = if len == 0 { 0 } else { self.cursor_row.min(len - 1) };
        self.cursor_col = self.cursor_col.min(Column::ALL.len() - 1);
        if self.scroll_offset > self.cursor_row {
            self.scroll_offset = self.cursor_row;
        }
    }

    /// Switch screens unless unsaved edits hold the user on this one
    pub fn switch_screen(&mut self, target: Screen) {
        if target == self.screen {
            return;
        }
        if !self.session.can_navigate(self.lock_navigation()) {
            self.set_error("unsaved changes: press s to save or r to discard");
            return;
        }
        self.screen = target;
        self.clear_status();
    }

    // -- work-step commands ------------------------------------------------

    pub fn cycle_filter(&mut self, forward: bool) {
        let next = cycle_selection(self.session.store(), self.session.selection(), forward);
        self.session.on_filter_change(next);
        self.cursor_row = 0;
        self.scroll_offset = 0;
        self.clear_status();
    }

    pub fn begin_edit(&mut self) {
        let view = self.view();
        let Some(record) = view.get(self.cursor_row) else {
            return;
        };
        self.edit_buffer = record.get(self.current_column()).to_string();
        self.edit_cursor = self.edit_buffer.len();
        self.mode = Mode::Edit;
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer.clear();
        self.edit_cursor = 0;
        self.mode = Mode::Navigate;
    }

    /// Write the edit buffer into the current cell
    pub fn commit_edit(&mut self) {
        let value = std::mem::take(&mut self.edit_buffer);
        self.edit_cursor = 0;
        self.mode = Mode::Navigate;
        match self
            .session
            .on_cell_edit(self.cursor_row, self.current_column(), value)
        {
            Ok(_) => self.clamp_cursor(),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn add_row(&mut self) {
        let idx = self.session.on_add_row();
        self.cursor_row = idx;
        self.cursor_col = Column::Group.index();
        self.begin_edit();
    }

    pub fn delete_row(&mut self, row: usize) {
        match self.session.on_delete_row(row) {
            Ok(removed) => {
                self.clamp_cursor();
                self.set_status(format!("removed row {}", removed.group));
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn save(&mut self) {
        let Some(sync) = self.sync.as_ref() else {
            let reason = self
                .backend_error
                .clone()
                .unwrap_or_else(|| "no backend".to_string());
            self.set_error(format!("cannot save: {}", reason));
            return;
        };
        match self.session.on_save(sync) {
            SaveOutcome::NothingToSave => self.set_status("nothing to save"),
            SaveOutcome::Saved { message, warning } => {
                self.cursor_row = 0;
                self.scroll_offset = 0;
                match warning {
                    Some(w) => self.set_error(w),
                    None => self.set_status(message.unwrap_or_else(|| "saved".to_string())),
                }
            }
            SaveOutcome::Failed { error } => {
                recovery::log_unsaved_table(
                    &self.workspace.state_dir(),
                    RecoveryCategory::SaveFailed,
                    sync.sheet(),
                    &error,
                    &sync::to_sheet_rows(self.session.store()),
                );
                self.set_error(format!("save failed: {} (press s to retry)", error));
            }
        }
    }

    /// Reload from the backend, keeping a copy of any discarded edits
    pub fn reload(&mut self) {
        let Some(sync) = self.sync.as_ref() else {
            return;
        };
        if self.session.is_dirty() {
            recovery::log_unsaved_table(
                &self.workspace.state_dir(),
                RecoveryCategory::Discarded,
                sync.sheet(),
                "edits discarded by reload",
                &sync::to_sheet_rows(self.session.store()),
            );
        }
        let warning = self.session.on_reload(sync);
        self.cursor_row = 0;
        self.scroll_offset = 0;
        match warning {
            Some(w) => self.set_error(w),
            None => self.set_status("reloaded"),
        }
    }

    // -- risk screen -------------------------------------------------------

    pub fn selected_department(&self) -> Option<&Department> {
        self.risk_selected.and_then(|i| self.departments.get(i))
    }

    /// The risk screen's save only reports success; nothing is persisted
    pub fn mock_risk_save(&mut self) {
        let Some(name) = self.selected_department().map(|d| d.name.clone()) else {
            self.set_error("select a department first");
            return;
        };
        tracing::info!(department = %name, "risk assessment save requested (not persisted)");
        self.set_status(format!("risk assessment for {} saved", name));
    }

    // -- confirm prompts ---------------------------------------------------

    pub fn ask(&mut self, message: impl Into<String>, action: ConfirmAction) {
        self.confirm_state = Some(ConfirmState {
            message: message.into(),
            action,
        });
        self.mode = Mode::Confirm;
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let ui_state = match read_ui_state(&app.workspace.state_dir()) {
        Some(s) => s,
        None => return,
    };

    if let Some(screen) = Screen::from_key(&ui_state.screen) {
        app.screen = screen;
    }
    if let Some(name) = ui_state.risk_department {
        app.risk_selected = app.departments.iter().position(|d| d.name == name);
        app.risk_cursor = app.risk_selected.unwrap_or(0);
    }
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, write_ui_state};

    let ui_state = UiState {
        screen: app.screen.key().to_string(),
        risk_department: app.selected_department().map(|d| d.name.clone()),
    };

    if let Err(e) = write_ui_state(&app.workspace.state_dir(), &ui_state) {
        tracing::warn!(error = %e, "could not write UI state");
    }
}

/// Run the TUI application
pub fn run(workspace: Workspace, offline: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::load(workspace, offline);

    // Restore saved UI state
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Save UI state before exit
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let before = app.screen;
            input::handle_key(app, key);
            if app.screen != before {
                save_ui_state(app);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
