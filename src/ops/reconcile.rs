use std::collections::HashSet;

use super::filter::FilterSelection;
use crate::model::{RecordStore, RowId, WorkStepRecord};

/// Outcome of folding an edited view back into the full table
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub store: RecordStore,
    /// The edited view differs from what was shown (count, order or values)
    pub changed: bool,
}

/// Merge `edited` (the user's version of `shown`) into `store`.
///
/// With `All` the edited table replaces the store outright. With a group
/// selection the rows that were shown are dropped, every other row keeps its
/// place, and the edited rows are appended after them. Membership is decided
/// by row id, not by the current group value, so rows whose group was edited
/// are neither lost nor duplicated.
pub fn reconcile(
    store: &RecordStore,
    selection: &FilterSelection,
    shown: &[WorkStepRecord],
    edited: Vec<WorkStepRecord>,
) -> Reconciliation {
    let changed = edited.as_slice() != shown;
    if !changed {
        return Reconciliation {
            store: store.clone(),
            changed,
        };
    }

    let foreign: Vec<WorkStepRecord> = match selection {
        FilterSelection::All => Vec::new(),
        FilterSelection::Group(_) => {
            let shown_ids: HashSet<RowId> = shown.iter().map(|r| r.row_id).collect();
            store
                .records()
                .iter()
                .filter(|r| !shown_ids.contains(&r.row_id))
                .cloned()
                .collect()
        }
    };

    let mut next = store.clone();
    let reserved: HashSet<RowId> = foreign.iter().map(|r| r.row_id).collect();
    let edited = assign_ids(&mut next, edited, &reserved);

    let mut merged = foreign;
    merged.extend(edited);
    next.replace_records(merged);

    Reconciliation {
        store: next,
        changed,
    }
}

/// Keep each record's id unless a foreign row owns it or an earlier record
/// in the batch already claimed it; those get a fresh id from the store.
fn assign_ids(
    store: &mut RecordStore,
    records: Vec<WorkStepRecord>,
    reserved: &HashSet<RowId>,
) -> Vec<WorkStepRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .map(|mut r| {
            if reserved.contains(&r.row_id) || !seen.insert(r.row_id) {
                r.row_id = store.allocate_id();
                seen.insert(r.row_id);
            }
            r
        })
        .collect()
}
