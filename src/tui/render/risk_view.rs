use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::model::Department;
use crate::tui::app::App;

/// Department picker on the left, scored table on the right
pub fn render_risk_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(1)])
        .split(area);

    render_department_list(frame, app, chunks[0]);
    match app.selected_department() {
        Some(department) => render_assessment(frame, app, department, chunks[1]),
        None => {
            let bg = app.theme.background;
            let prompt = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    " Select a department to view its risk assessment",
                    Style::default().fg(app.theme.dim).bg(bg),
                )),
            ])
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(bg));
            frame.render_widget(prompt, chunks[1]);
        }
    }
}

fn render_department_list(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let lines: Vec<Line> = app
        .departments
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let is_cursor = i == app.risk_cursor;
            let is_selected = app.risk_selected == Some(i);
            let marker = if is_selected { "\u{25B8} " } else { "  " };
            let mut style = Style::default().fg(app.theme.text).bg(if is_cursor {
                app.theme.selection_bg
            } else {
                bg
            });
            if is_selected {
                style = style.fg(app.theme.text_bright).add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(format!("{}{}", marker, d.name), style))
        })
        .collect();

    let block = Block::default()
        .title(" Department ")
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_assessment(frame: &mut Frame, app: &App, department: &Department, area: Rect) {
    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(
        ["Activity", "Hazard", "Controls", "L", "C", "Score"]
            .into_iter()
            .map(|h| Cell::from(h).style(header_style)),
    );

    let text = Style::default().fg(app.theme.text).bg(bg);
    let rows: Vec<Row> = department
        .entries
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(e.activity.clone()).style(text),
                Cell::from(e.hazard.clone()).style(text),
                Cell::from(e.controls.clone()).style(text),
                Cell::from(e.likelihood.to_string()).style(text),
                Cell::from(e.consequence.to_string()).style(text),
                Cell::from(format!("{} {}", e.score(), e.band().label()))
                    .style(app.theme.band_style(e.band())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(format!(" {} ", department.name))
                .style(Style::default().bg(bg)),
        );
    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{TERM_H, app_with_rows, render_to_string};
    use tempfile::TempDir;

    #[test]
    fn prompts_until_a_department_is_chosen() {
        let tmp = TempDir::new().unwrap();
        let (app, _b) = app_with_rows(tmp.path(), vec![]);
        let out = render_to_string(100, TERM_H, |frame, area| {
            render_risk_view(frame, &app, area);
        });
        assert!(out.contains("Production"));
        assert!(out.contains("Accounting"));
        assert!(out.contains("Select a department"));
    }

    #[test]
    fn selected_department_shows_scores_and_bands() {
        let tmp = TempDir::new().unwrap();
        let (mut app, _b) = app_with_rows(tmp.path(), vec![]);
        app.risk_selected = Some(0);
        let out = render_to_string(120, TERM_H, |frame, area| {
            render_risk_view(frame, &app, area);
        });
        assert!(!out.contains("Select a department"));
        assert!(out.contains("12 high"));
        assert!(out.contains("10 high"));
    }
}
