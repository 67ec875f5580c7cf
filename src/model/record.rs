use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Session-local surrogate identifier for a work-step row.
///
/// Assigned by the [`RecordStore`] when a row enters it. Never sent to the
/// backend and ignored by value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// One editable column of the work-step table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Group,
    Activity,
    Position,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Group, Column::Activity, Column::Position];

    /// Header label shown in the table
    pub fn label(self) -> &'static str {
        match self {
            Column::Group => "Group",
            Column::Activity => "Work step / activity",
            Column::Position => "Position",
        }
    }

    /// Field key on the backend sheet
    pub fn backend_key(self) -> &'static str {
        match self {
            Column::Group => "id",
            Column::Activity => "activity",
            Column::Position => "position",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Column::Group => 0,
            Column::Activity => 1,
            Column::Position => 2,
        }
    }

    pub fn from_index(idx: usize) -> Option<Column> {
        Column::ALL.get(idx).copied()
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "group" | "id" => Ok(Column::Group),
            "activity" => Ok(Column::Activity),
            "position" => Ok(Column::Position),
            other => Err(format!("unknown column: {}", other)),
        }
    }
}

/// A single row of the work-step table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkStepRecord {
    /// Grouping key, used for filtering and merging
    pub group: String,
    /// Free-text description of the work step
    pub activity: String,
    /// Job title associated with the step
    pub position: String,

    #[serde(skip)]
    pub row_id: RowId,
}

impl WorkStepRecord {
    pub fn new(
        group: impl Into<String>,
        activity: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        WorkStepRecord {
            group: group.into(),
            activity: activity.into(),
            position: position.into(),
            row_id: RowId::default(),
        }
    }

    /// A row is blank (discardable) when its group is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.group.trim().is_empty()
    }

    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Group => &self.group,
            Column::Activity => &self.activity,
            Column::Position => &self.position,
        }
    }

    pub fn set(&mut self, column: Column, value: String) {
        match column {
            Column::Group => self.group = value,
            Column::Activity => self.activity = value,
            Column::Position => self.position = value,
        }
    }
}

impl PartialEq for WorkStepRecord {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group
            && self.activity == other.activity
            && self.position == other.position
    }
}

impl Eq for WorkStepRecord {}

/// Drop every blank row, keeping the order of the rest
pub fn strip_blank(records: Vec<WorkStepRecord>) -> Vec<WorkStepRecord> {
    records.into_iter().filter(|r| !r.is_blank()).collect()
}

/// The ordered, in-memory work-step table for one session
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<WorkStepRecord>,
    next_id: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        RecordStore::default()
    }

    /// Build a store from rows, assigning fresh row ids in order
    pub fn from_records(records: impl IntoIterator<Item = WorkStepRecord>) -> Self {
        let mut store = RecordStore::new();
        for record in records {
            store.push(record);
        }
        store
    }

    pub fn records(&self) -> &[WorkStepRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reserve the next row id without inserting anything
    pub fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a record, giving it a fresh row id. Returns that id.
    pub fn push(&mut self, mut record: WorkStepRecord) -> RowId {
        let id = self.allocate_id();
        record.row_id = id;
        self.records.push(record);
        id
    }

    pub fn find(&self, id: RowId) -> Option<&WorkStepRecord> {
        self.records.iter().find(|r| r.row_id == id)
    }

    /// Replace the record sequence wholesale. Row ids on the incoming
    /// records are kept as-is; the id counter is never rewound.
    pub fn replace_records(&mut self, records: Vec<WorkStepRecord>) {
        if let Some(max) = records.iter().map(|r| r.row_id.0).max() {
            self.next_id = self.next_id.max(max + 1);
        }
        self.records = records;
    }

    /// Records with a non-blank group, in store order
    pub fn non_blank(&self) -> Vec<WorkStepRecord> {
        strip_blank(self.records.clone())
    }
}

impl PartialEq for RecordStore {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for RecordStore {}

/// The work steps the dashboard ships with, used to seed an empty local sheet
pub fn sample_records() -> Vec<WorkStepRecord> {
    vec![
        WorkStepRecord::new("T001", "Checking consumable supplies", "Supply officer"),
        WorkStepRecord::new("T002", "Recording income accounts", "Accounting officer"),
        WorkStepRecord::new("T003", "Advising new patients", "Registered nurse"),
        WorkStepRecord::new("T004", "Preparing the monthly report", "Accounting officer"),
        WorkStepRecord::new("T005", "Storing drugs and medical supplies", "Pharmacist / assistant"),
    ]
}
