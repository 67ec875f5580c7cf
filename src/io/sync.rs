use serde_json::Value;

use super::backend::{RawRow, SheetBackend, SheetRow, SyncError, WriteAck};
use crate::model::{Column, RecordStore, WorkStepRecord};

/// Result of a load. Loading never fails: on any error the store is empty
/// and `warning` says why.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub store: RecordStore,
    pub warning: Option<String>,
}

/// Round-trips the work-step table to and from a sheet backend.
///
/// Saves are full overwrites: the whole table is sent every time.
pub struct RemoteSync {
    backend: Box<dyn SheetBackend>,
    sheet: String,
}

impl RemoteSync {
    pub fn new(backend: Box<dyn SheetBackend>, sheet: impl Into<String>) -> Self {
        RemoteSync {
            backend,
            sheet: sheet.into(),
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn describe(&self) -> String {
        format!("{} [{}]", self.backend.describe(), self.sheet)
    }

    /// Read and normalize the sheet, propagating any error
    pub fn try_load(&self) -> Result<Vec<WorkStepRecord>, SyncError> {
        let rows = self.backend.read(&self.sheet)?;
        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let record = row_to_record(row, i)?;
            if !record.is_blank() {
                records.push(record);
            }
        }
        Ok(records)
    }

    pub fn load(&self) -> LoadOutcome {
        match self.try_load() {
            Ok(records) => {
                tracing::info!(sheet = %self.sheet, rows = records.len(), "loaded work steps");
                LoadOutcome {
                    store: RecordStore::from_records(records),
                    warning: None,
                }
            }
            Err(e) => {
                tracing::warn!(sheet = %self.sheet, error = %e, "load failed, using empty table");
                LoadOutcome {
                    store: RecordStore::new(),
                    warning: Some(format!("could not load work steps: {}", e)),
                }
            }
        }
    }

    /// Overwrite the sheet with every non-blank row of `store`
    pub fn save(&self, store: &RecordStore) -> Result<WriteAck, SyncError> {
        let rows = to_sheet_rows(store);
        match self.backend.write(&self.sheet, &rows) {
            Ok(ack) => {
                tracing::info!(sheet = %self.sheet, rows = rows.len(), "saved work steps");
                Ok(ack)
            }
            Err(e) => {
                tracing::warn!(sheet = %self.sheet, error = %e, "save failed");
                Err(e)
            }
        }
    }
}

/// Serialize a store to backend rows, stripping blank-group rows
pub fn to_sheet_rows(store: &RecordStore) -> Vec<SheetRow> {
    store
        .records()
        .iter()
        .filter(|r| !r.is_blank())
        .map(|r| SheetRow {
            id: r.group.clone(),
            activity: r.activity.clone(),
            position: r.position.clone(),
        })
        .collect()
}

/// Map one backend row to a record, renaming keys and dropping any other
/// fields the sheet carries (row indexes and the like).
pub fn row_to_record(row: &RawRow, index: usize) -> Result<WorkStepRecord, SyncError> {
    let field = |column: Column| -> Result<String, SyncError> {
        let key = column.backend_key();
        let value = row.get(key).ok_or_else(|| {
            SyncError::Schema(format!("row {} is missing field '{}'", index, key))
        })?;
        cell_text(value).ok_or_else(|| {
            SyncError::Schema(format!("row {} field '{}' is not a scalar", index, key))
        })
    };
    Ok(WorkStepRecord::new(
        field(Column::Group)?,
        field(Column::Activity)?,
        field(Column::Position)?,
    ))
}

/// Spreadsheet cells come back as whatever JSON type the sheet inferred
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::testing::MemoryBackend;
    use serde_json::json;

    fn raw(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn load_renames_keys_and_drops_bookkeeping() {
        let backend = MemoryBackend::with_rows(vec![raw(json!({
            "row": 2, "id": "A", "activity": "x", "position": "p"
        }))]);
        let sync = RemoteSync::new(Box::new(backend), "work_steps");
        let outcome = sync.load();
        assert!(outcome.warning.is_none());
        assert_eq!(
            outcome.store.records(),
            &[WorkStepRecord::new("A", "x", "p")]
        );
    }

    #[test]
    fn load_filters_blank_groups_and_stringifies_cells() {
        let backend = MemoryBackend::with_rows(vec![
            raw(json!({"id": 101, "activity": "x", "position": null})),
            raw(json!({"id": "   ", "activity": "ghost", "position": "p"})),
            raw(json!({"id": "", "activity": "", "position": ""})),
        ]);
        let sync = RemoteSync::new(Box::new(backend), "work_steps");
        let outcome = sync.load();
        assert_eq!(
            outcome.store.records(),
            &[WorkStepRecord::new("101", "x", "")]
        );
    }

    #[test]
    fn load_schema_mismatch_yields_empty_with_warning() {
        let backend = MemoryBackend::with_rows(vec![
            raw(json!({"id": "A", "activity": "x", "position": "p"})),
            raw(json!({"id": "B", "activity": "y"})),
        ]);
        let sync = RemoteSync::new(Box::new(backend), "work_steps");
        let outcome = sync.load();
        assert!(outcome.store.is_empty());
        let warning = outcome.warning.unwrap();
        assert!(warning.contains("missing field 'position'"), "{}", warning);
    }

    #[test]
    fn load_transport_failure_yields_empty_with_warning() {
        let backend = MemoryBackend::default();
        backend.fail_reads("connection refused");
        let sync = RemoteSync::new(Box::new(backend), "work_steps");
        let outcome = sync.load();
        assert!(outcome.store.is_empty());
        assert!(outcome.warning.unwrap().contains("connection refused"));
    }

    #[test]
    fn save_strips_blank_rows_from_payload() {
        let backend = MemoryBackend::default();
        let sync = RemoteSync::new(Box::new(backend.clone()), "work_steps");
        let store = RecordStore::from_records(vec![
            WorkStepRecord::new("A", "x", "p"),
            WorkStepRecord::new("  ", "draft", ""),
        ]);
        sync.save(&store).unwrap();
        let sent = backend.writes();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0],
            vec![SheetRow {
                id: "A".into(),
                activity: "x".into(),
                position: "p".into(),
            }]
        );
    }

    #[test]
    fn save_then_load_round_trips() {
        let backend = MemoryBackend::default();
        let sync = RemoteSync::new(Box::new(backend), "work_steps");
        let store = RecordStore::from_records(vec![
            WorkStepRecord::new("B", "y", "q"),
            WorkStepRecord::new("A", "x", "p"),
            WorkStepRecord::new("", "blank", ""),
        ]);
        sync.save(&store).unwrap();
        let reloaded = sync.load();
        assert!(reloaded.warning.is_none());
        assert_eq!(reloaded.store.records(), store.non_blank().as_slice());
    }
}
