use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw row object as the backend returns it, keyed by backend field names
pub type RawRow = Map<String, Value>;

/// Error type for backend round-trips
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend returned status {status:?}{}", message_suffix(.message))]
    Status {
        status: String,
        message: Option<String>,
    },
    #[error("unexpected sheet data: {0}")]
    Schema(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}

/// A row as written to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    /// The work-step group
    pub id: String,
    pub activity: String,
    pub position: String,
}

/// Response envelope of a read request
#[derive(Debug, Deserialize)]
pub struct ReadResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response envelope of a write request
#[derive(Debug, Deserialize)]
pub struct WriteResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Acknowledgement of an accepted write
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WriteAck {
    pub message: Option<String>,
}

pub const STATUS_SUCCESS: &str = "success";

impl ReadResponse {
    /// Unwrap the row objects of a successful response
    pub fn into_rows(self) -> Result<Vec<RawRow>, SyncError> {
        if self.status != STATUS_SUCCESS {
            return Err(SyncError::Status {
                status: self.status,
                message: self.message,
            });
        }
        match self.data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(SyncError::Schema(format!(
                        "row {} is not an object: {}",
                        i, other
                    ))),
                })
                .collect(),
            Some(other) => Err(SyncError::Schema(format!(
                "data is not a list: {}",
                other
            ))),
        }
    }
}

impl WriteResponse {
    pub fn into_ack(self) -> Result<WriteAck, SyncError> {
        if self.status != STATUS_SUCCESS {
            return Err(SyncError::Status {
                status: self.status,
                message: self.message,
            });
        }
        Ok(WriteAck {
            message: self.message,
        })
    }
}

/// An opaque key-value table store.
///
/// `write` replaces the entire contents of the named sheet.
pub trait SheetBackend {
    fn read(&self, sheet: &str) -> Result<Vec<RawRow>, SyncError>;
    fn write(&self, sheet: &str, rows: &[SheetRow]) -> Result<WriteAck, SyncError>;

    /// Short human-readable description for status lines and logs
    fn describe(&self) -> String;
}

impl<B: SheetBackend + ?Sized> SheetBackend for Box<B> {
    fn read(&self, sheet: &str) -> Result<Vec<RawRow>, SyncError> {
        (**self).read(sheet)
    }

    fn write(&self, sheet: &str, rows: &[SheetRow]) -> Result<WriteAck, SyncError> {
        (**self).write(sheet, rows)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
