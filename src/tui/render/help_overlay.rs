use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Screen};

use super::helpers::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Screens", header_style)));
    add_binding(&mut lines, " 1 2 3", "Manual / Work steps / Risk", key_style, desc_style);
    add_binding(&mut lines, " Tab S-Tab", "Next / previous screen", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);
    lines.push(Line::from(""));

    // Context-sensitive help
    match app.screen {
        Screen::Manual => {}
        Screen::WorkSteps => {
            lines.push(Line::from(Span::styled(" Work steps", header_style)));
            add_binding(&mut lines, " \u{2191}\u{2193}\u{2190}\u{2192} hjkl", "Move between cells", key_style, desc_style);
            add_binding(&mut lines, " Enter / e", "Edit cell", key_style, desc_style);
            add_binding(&mut lines, " a", "Add row", key_style, desc_style);
            add_binding(&mut lines, " d", "Delete row", key_style, desc_style);
            add_binding(&mut lines, " f / F", "Next / previous group filter", key_style, desc_style);
            add_binding(&mut lines, " s", "Save table", key_style, desc_style);
            add_binding(&mut lines, " r", "Reload (discards edits)", key_style, desc_style);
            lines.push(Line::from(""));
            if app.lock_navigation() {
                lines.push(Line::from(Span::styled(
                    " Unsaved edits keep you on this screen until saved or discarded.",
                    Style::default().fg(app.theme.dim).bg(bg),
                )));
            }
        }
        Screen::Risk => {
            lines.push(Line::from(Span::styled(" Risk assessment", header_style)));
            add_binding(&mut lines, " \u{2191}\u{2193} jk", "Move in department list", key_style, desc_style);
            add_binding(&mut lines, " Enter", "Show department", key_style, desc_style);
            add_binding(&mut lines, " Esc", "Clear selection", key_style, desc_style);
            add_binding(&mut lines, " s", "Save assessment", key_style, desc_style);
        }
    }

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}
