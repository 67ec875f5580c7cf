use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::app::App;

/// Heading, one instruction line and the manual link
pub fn render_manual_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Risk Assessment Manual",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Open the link below to download the manual:",
            Style::default().fg(app.theme.text).bg(bg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", app.workspace.config.ui.manual_url),
            Style::default()
                .fg(app.theme.cyan)
                .bg(bg)
                .add_modifier(Modifier::UNDERLINED),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
