mod client;
pub mod models;
pub mod token;

pub use client::GoogleSheetsClient;
pub use models::{AppendOutcome, AppointmentEvent, RowRecord, WebhookPayload};

use async_trait::async_trait;

use crate::error::BridgeResult;
use models::HEADER_ROW;

/// Remote spreadsheet operations the bridge depends on
#[async_trait]
pub trait SheetsBackend: Send + Sync + 'static {
    /// Look up a sheet id by exact title, `None` when no such sheet exists
    async fn find_sheet(&self, title: &str) -> BridgeResult<Option<i64>>;

    /// Add a new sheet with the given title, returning its id
    async fn add_sheet(&self, title: &str) -> BridgeResult<i64>;

    /// Overwrite cell values in a range
    async fn write_values(&self, range: &str, rows: Vec<Vec<String>>) -> BridgeResult<()>;

    /// Append one row after the last data row of a sheet
    async fn append_row(&self, title: &str, row: RowRecord) -> BridgeResult<AppendOutcome>;
}

/// Make sure a sheet with the given title exists, creating it with a header
/// row when it does not.
///
/// The existence check is re-run on every call, so a sheet created by an
/// earlier request is found instead of recreated. Two concurrent requests
/// that both see the sheet missing will both attempt to create it; the
/// backend then rejects the second attempt with a duplicate-title error.
pub async fn ensure_sheet(backend: &dyn SheetsBackend, title: &str) -> BridgeResult<()> {
    if backend.find_sheet(title).await?.is_some() {
        return Ok(());
    }

    backend.add_sheet(title).await?;

    let header = HEADER_ROW.iter().map(|c| c.to_string()).collect();
    backend
        .write_values(&format!("{}!A1:E1", title), vec![header])
        .await
}
