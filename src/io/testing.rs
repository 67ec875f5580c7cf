//! In-memory sheet backend for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use super::backend::{RawRow, SheetBackend, SheetRow, SyncError, WriteAck};

#[derive(Default)]
struct Inner {
    rows: Vec<RawRow>,
    writes: Vec<Vec<SheetRow>>,
    read_error: Option<String>,
    write_error: Option<String>,
}

/// Shares its state between clones, so a test can keep a handle after
/// boxing one into a `RemoteSync`.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryBackend {
    pub fn with_rows(rows: Vec<RawRow>) -> Self {
        let backend = MemoryBackend::default();
        backend.inner.borrow_mut().rows = rows;
        backend
    }

    pub fn fail_reads(&self, message: &str) {
        self.inner.borrow_mut().read_error = Some(message.to_string());
    }

    pub fn fail_writes(&self, message: &str) {
        self.inner.borrow_mut().write_error = Some(message.to_string());
    }

    pub fn recover(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.read_error = None;
        inner.write_error = None;
    }

    /// Every payload accepted so far, oldest first
    pub fn writes(&self) -> Vec<Vec<SheetRow>> {
        self.inner.borrow().writes.clone()
    }
}

impl SheetBackend for MemoryBackend {
    fn read(&self, _sheet: &str) -> Result<Vec<RawRow>, SyncError> {
        let inner = self.inner.borrow();
        if let Some(msg) = &inner.read_error {
            return Err(SyncError::Transport(msg.clone()));
        }
        Ok(inner.rows.clone())
    }

    fn write(&self, _sheet: &str, rows: &[SheetRow]) -> Result<WriteAck, SyncError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(msg) = &inner.write_error {
            return Err(SyncError::Transport(msg.clone()));
        }
        inner.rows = rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let mut row = RawRow::new();
                row.insert("row".into(), Value::from(i + 2));
                row.insert("id".into(), Value::String(r.id.clone()));
                row.insert("activity".into(), Value::String(r.activity.clone()));
                row.insert("position".into(), Value::String(r.position.clone()));
                row
            })
            .collect();
        inner.writes.push(rows.to_vec());
        Ok(WriteAck::default())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
