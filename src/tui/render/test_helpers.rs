use std::path::Path;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::backend::RawRow;
use crate::io::config_io::Workspace;
use crate::io::sync::RemoteSync;
use crate::io::testing::MemoryBackend;
use crate::model::WorkStepRecord;
use crate::ops::session::WorkStepSession;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An app over an in-memory backend seeded with `rows`, with its state
/// directory under `root`. The returned backend shares state with the app's.
pub fn app_with_rows(root: &Path, rows: Vec<WorkStepRecord>) -> (App, MemoryBackend) {
    let raw: Vec<RawRow> = rows
        .iter()
        .map(|r| {
            let mut row = RawRow::new();
            row.insert("id".into(), r.group.clone().into());
            row.insert("activity".into(), r.activity.clone().into());
            row.insert("position".into(), r.position.clone().into());
            row
        })
        .collect();
    let backend = MemoryBackend::with_rows(raw);
    let sync = RemoteSync::new(Box::new(backend.clone()), "work_steps");
    let (session, warning) = WorkStepSession::load(&sync);
    assert!(warning.is_none());
    let app = App::new(Workspace::with_defaults(root), Some(sync), session);
    (app, backend)
}
