use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, Screen};
use crate::util::unicode::truncate_to_width;

use super::helpers::push_right_hint;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let fill = Style::default().bg(bg);

    let line = match app.mode {
        Mode::Navigate => {
            let mut spans: Vec<Span> = Vec::new();
            if let Some(ref msg) = app.status_message {
                let color = if app.status_is_error {
                    app.theme.red
                } else {
                    app.theme.green
                };
                spans.push(Span::styled(
                    truncate_to_width(msg, width),
                    Style::default().fg(color).bg(bg),
                ));
            }
            let hint = match app.screen {
                Screen::Manual => "Tab next screen  ? help  q quit",
                Screen::WorkSteps => "e edit  a add  d delete  f filter  s save  r reload  ? help",
                Screen::Risk => "Enter select  s save  ? help",
            };
            push_right_hint(&mut spans, hint, width, fill, dim);
            Line::from(spans)
        }
        Mode::Edit => {
            let (before, after) = app.edit_buffer.split_at(app.edit_cursor);
            let mut spans = vec![
                Span::styled(
                    format!("{}: ", app.current_column().label()),
                    Style::default().fg(app.theme.highlight).bg(bg),
                ),
                Span::styled(
                    before.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
                Span::styled(
                    after.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
            ];
            push_right_hint(&mut spans, "Enter save cell  Tab next  Esc cancel", width, fill, dim);
            Line::from(spans)
        }
        Mode::Confirm => {
            let message = app
                .confirm_state
                .as_ref()
                .map(|s| s.message.as_str())
                .unwrap_or("");
            Line::from(vec![
                Span::styled(
                    message.to_string(),
                    Style::default().fg(app.theme.yellow).bg(bg),
                ),
                Span::styled(" (y/n)", dim),
            ])
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkStepRecord;
    use crate::tui::app::ConfirmAction;
    use crate::tui::render::test_helpers::{TERM_W, app_with_rows, render_to_string};
    use tempfile::TempDir;

    #[test]
    fn navigate_shows_message_and_hints() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _b) = app_with_rows(tmp.path(), vec![]);
        app.screen = Screen::WorkSteps;
        app.set_error("save failed");
        let out = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(out.starts_with("save failed"));
        assert!(out.ends_with("? help"));
    }

    #[test]
    fn edit_shows_buffer_with_cursor() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _b) = app_with_rows(tmp.path(), vec![WorkStepRecord::new("A", "x", "p")]);
        app.screen = Screen::WorkSteps;
        app.cursor_col = 2;
        app.begin_edit();
        app.edit_cursor = 0;
        let out = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(out.starts_with("Position: \u{258C}p"));
    }

    #[test]
    fn confirm_shows_question() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _b) = app_with_rows(tmp.path(), vec![]);
        app.ask("discard unsaved changes and reload?", ConfirmAction::Reload);
        let out = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(out, "discard unsaved changes and reload? (y/n)");
    }
}
