use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Column;
use crate::tui::app::{App, ConfirmAction, Screen};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Keys that work on every screen
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => {
            request_quit(app);
            return;
        }
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
            return;
        }
        (KeyModifiers::NONE, KeyCode::Tab) => {
            let next = app.screen.next();
            app.switch_screen(next);
            return;
        }
        (_, KeyCode::BackTab) => {
            let prev = app.screen.prev();
            app.switch_screen(prev);
            return;
        }
        (_, KeyCode::Char(c @ '1'..='3')) => {
            let idx = c as usize - '1' as usize;
            app.switch_screen(Screen::ALL[idx]);
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::Manual => {}
        Screen::WorkSteps => handle_worksteps(app, key),
        Screen::Risk => handle_risk(app, key),
    }
}

/// Quit, asking first if there are unsaved edits
pub(super) fn request_quit(app: &mut App) {
    if app.session.is_dirty() {
        app.ask("quit and discard unsaved changes?", ConfirmAction::Quit);
    } else {
        app.should_quit = true;
    }
}

fn handle_worksteps(app: &mut App, key: KeyEvent) {
    let len = app.view().len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.cursor_row = app.cursor_row.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.cursor_row + 1 < len {
                app.cursor_row += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.cursor_col = app.cursor_col.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if app.cursor_col + 1 < Column::ALL.len() {
                app.cursor_col += 1;
            }
        }
        KeyCode::Char('g') | KeyCode::Home => app.cursor_row = 0,
        KeyCode::Char('G') | KeyCode::End => app.cursor_row = len.saturating_sub(1),
        KeyCode::Enter | KeyCode::Char('e') => app.begin_edit(),
        KeyCode::Char('a') => app.add_row(),
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(record) = app.view().get(app.cursor_row) {
                let label = if record.is_blank() {
                    "blank row".to_string()
                } else {
                    format!("{} / {}", record.group, record.activity)
                };
                let row = app.cursor_row;
                app.ask(format!("delete {}?", label), ConfirmAction::DeleteRow { row });
            }
        }
        KeyCode::Char('f') => app.cycle_filter(true),
        KeyCode::Char('F') => app.cycle_filter(false),
        KeyCode::Char('s') => app.save(),
        KeyCode::Char('r') => {
            if app.session.is_dirty() {
                app.ask("discard unsaved changes and reload?", ConfirmAction::Reload);
            } else {
                app.reload();
            }
        }
        _ => {}
    }
}

fn handle_risk(app: &mut App, key: KeyEvent) {
    let count = app.departments.len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.risk_cursor = app.risk_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.risk_cursor + 1 < count {
                app.risk_cursor += 1;
            }
        }
        KeyCode::Enter => {
            if app.risk_cursor < count {
                app.risk_selected = Some(app.risk_cursor);
                app.clear_status();
            }
        }
        KeyCode::Esc => app.risk_selected = None,
        KeyCode::Char('s') => app.mock_risk_save(),
        _ => {}
    }
}
