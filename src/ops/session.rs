use std::collections::HashSet;

use super::filter::{self, FilterSelection};
use super::reconcile::reconcile;
use crate::io::sync::RemoteSync;
use crate::model::{Column, DirtyGate, RecordStore, RowId, WorkStepRecord};

/// Error type for session commands
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("row {0} is out of range")]
    RowOutOfRange(usize),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// Resolve a column by name ("group"/"id", "activity", "position")
pub fn parse_column(name: &str) -> Result<Column, SessionError> {
    name.parse()
        .map_err(|_| SessionError::UnknownColumn(name.to_string()))
}

/// Resolve a column by its position in the table
pub fn column_at(index: usize) -> Result<Column, SessionError> {
    Column::from_index(index).ok_or_else(|| SessionError::UnknownColumn(index.to_string()))
}

/// Result of the save command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The gate was clean; nothing was sent
    NothingToSave,
    /// The backend accepted the table. `warning` is set when the follow-up
    /// reload failed and the local copy was kept instead.
    Saved {
        message: Option<String>,
        warning: Option<String>,
    },
    /// The backend rejected the table or could not be reached. The store
    /// and the gate are untouched.
    Failed { error: String },
}

/// Session state for the work-step editor: the record store, the active
/// filter and the dirty gate, changed only through the `on_*` commands.
#[derive(Debug, Clone, Default)]
pub struct WorkStepSession {
    store: RecordStore,
    selection: FilterSelection,
    /// Rows added or re-keyed under the current selection. They stay in the
    /// view until the selection changes, even though they no longer match it.
    pinned: HashSet<RowId>,
    gate: DirtyGate,
}

impl WorkStepSession {
    /// A clean session over freshly loaded data
    pub fn new(store: RecordStore) -> Self {
        WorkStepSession {
            store,
            ..Default::default()
        }
    }

    /// Load from the backend. Never fails; a load problem leaves an empty
    /// table and a warning.
    pub fn load(sync: &RemoteSync) -> (Self, Option<String>) {
        let outcome = sync.load();
        (WorkStepSession::new(outcome.store), outcome.warning)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn gate(&self) -> &DirtyGate {
        &self.gate
    }

    pub fn is_dirty(&self) -> bool {
        self.gate.is_dirty()
    }

    pub fn can_navigate(&self, locked: bool) -> bool {
        self.gate.allows_navigation(locked)
    }

    pub fn filter_options(&self) -> Vec<String> {
        filter::filter_options(&self.store)
    }

    /// The editable view, recomputed from the store on every call
    pub fn view(&self) -> Vec<WorkStepRecord> {
        self.store
            .records()
            .iter()
            .filter(|r| self.selection.matches(r) || self.pinned.contains(&r.row_id))
            .cloned()
            .collect()
    }

    pub fn on_filter_change(&mut self, selection: FilterSelection) {
        tracing::debug!(filter = %selection, "filter changed");
        self.selection = selection;
        self.pinned.clear();
    }

    /// Fold an edited copy of [`view`](Self::view) back into the store.
    /// Returns whether anything changed; any change marks the gate dirty.
    pub fn apply_edit(&mut self, edited: Vec<WorkStepRecord>) -> bool {
        let shown = self.view();
        let result = reconcile(&self.store, &self.selection, &shown, edited);
        if !result.changed {
            return false;
        }

        if !self.selection.is_all() {
            let shown_ids: HashSet<RowId> = shown.iter().map(|r| r.row_id).collect();
            let foreign: HashSet<RowId> = self
                .store
                .records()
                .iter()
                .map(|r| r.row_id)
                .filter(|id| !shown_ids.contains(id))
                .collect();
            self.pinned = result
                .store
                .records()
                .iter()
                .filter(|r| !foreign.contains(&r.row_id) && !self.selection.matches(r))
                .map(|r| r.row_id)
                .collect();
        }

        self.store = result.store;
        self.gate.mark_dirty();
        true
    }

    /// Set one cell of the view. `row` indexes the current view.
    pub fn on_cell_edit(
        &mut self,
        row: usize,
        column: Column,
        value: String,
    ) -> Result<bool, SessionError> {
        let mut edited = self.view();
        let record = edited.get_mut(row).ok_or(SessionError::RowOutOfRange(row))?;
        record.set(column, value);
        let changed = self.apply_edit(edited);
        if changed {
            tracing::debug!(row, column = column.backend_key(), "cell edited");
        }
        Ok(changed)
    }

    /// Append a blank row to the view. Returns its index in the new view.
    pub fn on_add_row(&mut self) -> usize {
        let mut edited = self.view();
        let mut blank = WorkStepRecord::new("", "", "");
        let id = self.store.allocate_id();
        blank.row_id = id;
        edited.push(blank);
        self.apply_edit(edited);
        self.gate.mark_dirty();
        self.view()
            .iter()
            .position(|r| r.row_id == id)
            .unwrap_or(0)
    }

    /// Remove a row of the view, returning it
    pub fn on_delete_row(&mut self, row: usize) -> Result<WorkStepRecord, SessionError> {
        let mut edited = self.view();
        if row >= edited.len() {
            return Err(SessionError::RowOutOfRange(row));
        }
        let removed = edited.remove(row);
        self.apply_edit(edited);
        Ok(removed)
    }

    /// Push the whole table to the backend and, on success, reload it.
    pub fn on_save(&mut self, sync: &RemoteSync) -> SaveOutcome {
        if !self.gate.can_save() {
            return SaveOutcome::NothingToSave;
        }
        match sync.save(&self.store) {
            Ok(ack) => {
                let reload = sync.load();
                let (store, warning) = match reload.warning {
                    None => (reload.store, None),
                    Some(w) => (
                        RecordStore::from_records(self.store.non_blank()),
                        Some(format!("saved, but reload failed: {}", w)),
                    ),
                };
                self.reset(store);
                SaveOutcome::Saved {
                    message: ack.message,
                    warning,
                }
            }
            Err(e) => SaveOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    /// Discard pending edits and load fresh data. Returns the load warning.
    pub fn on_reload(&mut self, sync: &RemoteSync) -> Option<String> {
        let outcome = sync.load();
        self.reset(outcome.store);
        outcome.warning
    }

    fn reset(&mut self, store: RecordStore) {
        self.store = store;
        self.selection = FilterSelection::All;
        self.pinned.clear();
        self.gate.mark_clean();
    }
}
