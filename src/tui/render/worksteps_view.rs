use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use crate::model::Column;
use crate::ops::filter::FilterSelection;
use crate::tui::app::{App, Mode};
use crate::util::unicode::{byte_offset_to_display_col, next_grapheme_boundary};

const GROUP_WIDTH: u16 = 12;
const POSITION_WIDTH: u16 = 28;
const COLUMN_SPACING: u16 = 2;

/// Render the filter line and the editable work-step table
pub fn render_worksteps_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // filter line
            Constraint::Min(1),    // table
        ])
        .split(area);

    let view = app.view();
    render_filter_line(frame, app, chunks[0], view.len());

    if view.is_empty() {
        let msg = Paragraph::new(Span::styled(
            " No work steps. Press a to add one.",
            Style::default().fg(app.theme.dim).bg(bg),
        ))
        .style(Style::default().bg(bg));
        frame.render_widget(msg, chunks[1]);
        return;
    }

    // Keep the cursor row on screen (one line goes to the header)
    let visible = (chunks[1].height as usize).saturating_sub(1).max(1);
    if app.cursor_row < app.scroll_offset {
        app.scroll_offset = app.cursor_row;
    } else if app.cursor_row >= app.scroll_offset + visible {
        app.scroll_offset = app.cursor_row + 1 - visible;
    }

    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(
        Column::ALL
            .iter()
            .map(|c| Cell::from(c.label()).style(header_style)),
    );

    let table_width = chunks[1].width;
    let rows: Vec<Row> = view
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible)
        .map(|(i, record)| {
            let is_cursor_row = i == app.cursor_row;
            let row_bg = if is_cursor_row { app.theme.selection_bg } else { bg };
            let cells: Vec<Cell> = Column::ALL
                .iter()
                .map(|col| {
                    let is_cursor_cell = is_cursor_row && col.index() == app.cursor_col;
                    if is_cursor_cell && app.mode == Mode::Edit {
                        let text = edit_cell_text(
                            &app.edit_buffer,
                            app.edit_cursor,
                            cell_width(*col, table_width),
                        );
                        return Cell::from(text).style(
                            Style::default().fg(app.theme.text_bright).bg(app.theme.edit_bg),
                        );
                    }
                    let value = record.get(*col);
                    let (text, fg) = if *col == Column::Group && record.is_blank() {
                        ("(new)".to_string(), app.theme.dim)
                    } else {
                        (value.to_string(), app.theme.text)
                    };
                    let mut style = Style::default().fg(fg).bg(row_bg);
                    if is_cursor_cell {
                        style = style
                            .fg(app.theme.text_bright)
                            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                    }
                    Cell::from(text).style(style)
                })
                .collect();
            Row::new(cells).style(Style::default().bg(row_bg))
        })
        .collect();

    let widths = [
        Constraint::Length(GROUP_WIDTH),
        Constraint::Fill(1),
        Constraint::Length(POSITION_WIDTH),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .style(Style::default().bg(bg));
    frame.render_widget(table, chunks[1]);
}

/// Cells available to `column` in a table `table_width` wide
fn cell_width(column: Column, table_width: u16) -> usize {
    let width = match column {
        Column::Group => GROUP_WIDTH,
        Column::Position => POSITION_WIDTH,
        Column::Activity => {
            table_width.saturating_sub(GROUP_WIDTH + POSITION_WIDTH + 2 * COLUMN_SPACING)
        }
    };
    usize::from(width.max(1))
}

/// The edit buffer with the cursor glyph at `cursor` (a byte offset).
/// Leading graphemes scroll out so the glyph stays inside `width` cells.
fn edit_cell_text(buffer: &str, cursor: usize, width: usize) -> String {
    let (before, after) = buffer.split_at(cursor.min(buffer.len()));
    let cursor_col = byte_offset_to_display_col(before, before.len());
    let mut start = 0;
    while cursor_col - byte_offset_to_display_col(before, start) + 1 > width {
        match next_grapheme_boundary(before, start) {
            Some(next) => start = next,
            None => break,
        }
    }
    format!("{}\u{258C}{}", &before[start..], after)
}

fn render_filter_line(frame: &mut Frame, app: &App, area: Rect, shown: usize) {
    let bg = app.theme.background;
    let label = match app.session.selection() {
        FilterSelection::All => "All".to_string(),
        FilterSelection::Group(g) => g.clone(),
    };
    let line = Line::from(vec![
        Span::styled(" Filter: ", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(label, Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            format!("  ({} of {} rows)", shown, app.session.store().len()),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}
