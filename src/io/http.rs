use std::time::Duration;

use serde::Serialize;

use super::backend::{
    RawRow, ReadResponse, SheetBackend, SheetRow, SyncError, WriteAck, WriteResponse,
};
use crate::model::BackendConfig;

/// Spreadsheet bridge reached over HTTP.
///
/// Reads are `GET <endpoint>?action=read&sheet=..&spreadsheetId=..`; writes
/// `POST` the whole table as JSON.
pub struct HttpBackend {
    agent: ureq::Agent,
    endpoint: String,
    spreadsheet_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteRequest<'a> {
    action: &'static str,
    sheet: &'a str,
    spreadsheet_id: &'a str,
    data: &'a [SheetRow],
}

impl HttpBackend {
    pub fn new(endpoint: &str, spreadsheet_id: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        HttpBackend {
            agent,
            endpoint: endpoint.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        HttpBackend::new(
            &config.endpoint,
            &config.spreadsheet_id,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

fn transport_error(err: ureq::Error) -> SyncError {
    match err {
        ureq::Error::Status(code, response) => SyncError::Transport(format!(
            "HTTP {} {}",
            code,
            response.status_text()
        )),
        ureq::Error::Transport(t) => SyncError::Transport(t.to_string()),
    }
}

fn decode_error(err: std::io::Error) -> SyncError {
    SyncError::Schema(format!("invalid response body: {}", err))
}

impl SheetBackend for HttpBackend {
    fn read(&self, sheet: &str) -> Result<Vec<RawRow>, SyncError> {
        let response = self
            .agent
            .get(&self.endpoint)
            .query("action", "read")
            .query("sheet", sheet)
            .query("spreadsheetId", &self.spreadsheet_id)
            .call()
            .map_err(transport_error)?;
        let body: ReadResponse = response.into_json().map_err(decode_error)?;
        body.into_rows()
    }

    fn write(&self, sheet: &str, rows: &[SheetRow]) -> Result<WriteAck, SyncError> {
        let request = WriteRequest {
            action: "write",
            sheet,
            spreadsheet_id: &self.spreadsheet_id,
            data: rows,
        };
        let response = self
            .agent
            .post(&self.endpoint)
            .send_json(&request)
            .map_err(transport_error)?;
        let body: WriteResponse = response.into_json().map_err(decode_error)?;
        body.into_ack()
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
