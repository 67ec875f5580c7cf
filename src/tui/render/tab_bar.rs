use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Screen};

use super::helpers::spans_width;

/// Render the tab bar: one tab per screen, with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    spans.push(Span::styled(" ", Style::default().bg(bg)));
    spans.push(Span::styled(
        "\u{25B2}",
        Style::default().fg(app.theme.highlight).bg(bg),
    ));
    spans.push(Span::styled(" ", Style::default().bg(bg)));

    for (i, screen) in Screen::ALL.iter().enumerate() {
        let is_current = app.screen == *screen;
        spans.push(Span::styled(
            format!(" {} {} ", i + 1, screen.label()),
            tab_style(app, is_current),
        ));
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    // Unsaved marker on the right
    if app.session.is_dirty() {
        let marker = "\u{25CF} unsaved ";
        let used = spans_width(&spans);
        let width = area.width as usize;
        let marker_width = crate::util::unicode::display_width(marker);
        if used + marker_width < width {
            spans.push(Span::styled(
                " ".repeat(width - used - marker_width),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(
                marker,
                Style::default().fg(app.theme.yellow).bg(bg),
            ));
        }
    }

    let tabs = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let mut line: String = String::with_capacity(width * 3);
    for col in 0..width {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkStepRecord;
    use crate::tui::render::test_helpers::{TERM_W, app_with_rows, render_to_string};
    use tempfile::TempDir;

    #[test]
    fn tabs_list_every_screen() {
        let tmp = TempDir::new().unwrap();
        let (app, _b) = app_with_rows(tmp.path(), vec![]);
        let out = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        assert!(out.contains("1 Manual"));
        assert!(out.contains("2 Work steps"));
        assert!(out.contains("3 Risk assessment"));
        assert!(!out.contains("unsaved"));
    }

    #[test]
    fn dirty_session_shows_unsaved_marker() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _b) = app_with_rows(tmp.path(), vec![WorkStepRecord::new("A", "x", "p")]);
        app.session.on_add_row();
        let out = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        assert!(out.lines().next().unwrap().ends_with("unsaved"));
    }
}
