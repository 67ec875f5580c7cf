use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Column;
use crate::tui::app::App;
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// Single-line cell editor. Cursor moves by grapheme so Thai combining
/// marks stay attached to their base character.
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.cancel_edit(),
        (_, KeyCode::Enter) => app.commit_edit(),
        // Commit and continue in the next column
        (_, KeyCode::Tab) => {
            app.commit_edit();
            if app.cursor_col + 1 < Column::ALL.len() {
                app.cursor_col += 1;
                app.begin_edit();
            }
        }
        (_, KeyCode::Left) => {
            if let Some(pos) = prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = pos;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(pos) = next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = pos;
            }
        }
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => app.edit_cursor = 0,
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            app.edit_cursor = app.edit_buffer.len();
        }
        (_, KeyCode::Backspace) => {
            if let Some(pos) = prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.replace_range(pos..app.edit_cursor, "");
                app.edit_cursor = pos;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(pos) = next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.replace_range(app.edit_cursor..pos, "");
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            app.edit_buffer.replace_range(..app.edit_cursor, "");
            app.edit_cursor = 0;
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            app.edit_buffer.insert(app.edit_cursor, c);
            app.edit_cursor += c.len_utf8();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::model::WorkStepRecord;
    use crate::tui::app::{Mode, Screen};
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::{ch, key};
    use crate::tui::render::test_helpers::app_with_rows;
    use crossterm::event::KeyCode;

    fn type_str(app: &mut crate::tui::app::App, s: &str) {
        for c in s.chars() {
            handle_key(app, ch(c));
        }
    }

    #[test]
    fn enter_commits_cell_and_marks_dirty() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _b) = app_with_rows(tmp.path(), vec![WorkStepRecord::new("A", "x", "p")]);
        app.screen = Screen::WorkSteps;
        app.cursor_col = 1;
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.edit_buffer, "x");
        type_str(&mut app, "yz");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.view(), vec![WorkStepRecord::new("A", "xyz", "p")]);
        assert!(app.session.is_dirty());
    }

    #[test]
    fn esc_discards_buffer() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _b) = app_with_rows(tmp.path(), vec![WorkStepRecord::new("A", "x", "p")]);
        app.screen = Screen::WorkSteps;
        handle_key(&mut app, ch('e'));
        type_str(&mut app, "zzz");
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.view(), vec![WorkStepRecord::new("A", "x", "p")]);
        assert!(!app.session.is_dirty());
    }

    #[test]
    fn backspace_removes_whole_thai_cluster() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _b) = app_with_rows(tmp.path(), vec![WorkStepRecord::new("A", "x", "p")]);
        app.screen = Screen::WorkSteps;
        app.cursor_col = 1;
        handle_key(&mut app, ch('e'));
        handle_key(&mut app, key(KeyCode::Backspace));
        type_str(&mut app, "กล่");
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.edit_buffer, "ก");
        handle_key(&mut app, key(KeyCode::Left));
        assert_eq!(app.edit_cursor, 0);
    }

    #[test]
    fn add_row_then_tab_fills_columns() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _b) = app_with_rows(tmp.path(), vec![WorkStepRecord::new("A", "x", "p")]);
        app.screen = Screen::WorkSteps;
        handle_key(&mut app, ch('a'));
        assert_eq!(app.mode, Mode::Edit);
        type_str(&mut app, "T009");
        handle_key(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "Paint");
        handle_key(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "Painter");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(
            app.view(),
            vec![
                WorkStepRecord::new("A", "x", "p"),
                WorkStepRecord::new("T009", "Paint", "Painter"),
            ]
        );
    }
}
