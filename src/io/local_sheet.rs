use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::backend::{RawRow, SheetBackend, SheetRow, SyncError, WriteAck};
use super::recovery::atomic_write;
use crate::model::sample_records;

/// Offline backend: one JSON file per sheet under `<state_dir>/sheets/`.
///
/// Same contract as the remote bridge. A sheet that has never been written
/// reads as the built-in sample work steps.
pub struct LocalSheetBackend {
    dir: PathBuf,
}

impl LocalSheetBackend {
    pub fn new(state_dir: &Path) -> Self {
        LocalSheetBackend {
            dir: state_dir.join("sheets"),
        }
    }

    pub fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sheet))
    }
}

fn sample_rows() -> Vec<RawRow> {
    sample_records()
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let mut row = RawRow::new();
            row.insert("row".into(), Value::from(i + 2));
            row.insert("id".into(), Value::String(r.group));
            row.insert("activity".into(), Value::String(r.activity));
            row.insert("position".into(), Value::String(r.position));
            row
        })
        .collect()
}

impl SheetBackend for LocalSheetBackend {
    fn read(&self, sheet: &str) -> Result<Vec<RawRow>, SyncError> {
        let path = self.sheet_path(sheet);
        if !path.exists() {
            return Ok(sample_rows());
        }
        let text = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| SyncError::Schema(format!("{}: {}", path.display(), e)))?;
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(SyncError::Schema(format!("row is not an object: {}", other))),
                })
                .collect(),
            other => Err(SyncError::Schema(format!(
                "{}: expected a list of rows, found {}",
                path.display(),
                other
            ))),
        }
    }

    fn write(&self, sheet: &str, rows: &[SheetRow]) -> Result<WriteAck, SyncError> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(rows)
            .map_err(|e| SyncError::Schema(e.to_string()))?;
        atomic_write(&self.sheet_path(sheet), content.as_bytes())?;
        Ok(WriteAck {
            message: Some(format!("{} rows written", rows.len())),
        })
    }

    fn describe(&self) -> String {
        format!("local sheets in {}", self.dir.display())
    }
}
