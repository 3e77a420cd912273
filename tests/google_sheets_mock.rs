use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use sheetbridge::components::google_sheets::models::{AppendOutcome, RowRecord, HEADER_ROW};
use sheetbridge::components::google_sheets::{ensure_sheet, SheetsBackend};
use sheetbridge::error::{google_sheets_error, BridgeResult};

/// Mock implementation of the spreadsheet backend for testing
#[derive(Debug, Default)]
pub struct InMemorySheets {
    sheets: RwLock<HashMap<String, Vec<Vec<String>>>>,
}

impl InMemorySheets {
    /// Rows of a sheet, `None` when the sheet does not exist
    pub async fn rows(&self, title: &str) -> Option<Vec<Vec<String>>> {
        self.sheets.read().await.get(title).cloned()
    }
}

#[async_trait]
impl SheetsBackend for InMemorySheets {
    async fn find_sheet(&self, title: &str) -> BridgeResult<Option<i64>> {
        let sheets = self.sheets.read().await;
        Ok(if sheets.contains_key(title) { Some(0) } else { None })
    }

    async fn add_sheet(&self, title: &str) -> BridgeResult<i64> {
        let mut sheets = self.sheets.write().await;
        // The real API rejects a second sheet with the same title
        if sheets.contains_key(title) {
            return Err(google_sheets_error(&format!(
                "A sheet with the name \"{}\" already exists",
                title
            )));
        }
        sheets.insert(title.to_string(), Vec::new());
        Ok(sheets.len() as i64)
    }

    async fn write_values(&self, range: &str, rows: Vec<Vec<String>>) -> BridgeResult<()> {
        let title = range.split('!').next().unwrap_or(range);
        let mut sheets = self.sheets.write().await;
        let sheet = sheets
            .get_mut(title)
            .ok_or_else(|| google_sheets_error(&format!("No sheet named \"{}\"", title)))?;

        for (i, row) in rows.into_iter().enumerate() {
            if sheet.len() <= i {
                sheet.push(row);
            } else {
                sheet[i] = row;
            }
        }

        Ok(())
    }

    async fn append_row(&self, title: &str, row: RowRecord) -> BridgeResult<AppendOutcome> {
        let mut sheets = self.sheets.write().await;
        let sheet = sheets
            .get_mut(title)
            .ok_or_else(|| google_sheets_error(&format!("No sheet named \"{}\"", title)))?;

        sheet.push(row.into_cells());

        Ok(AppendOutcome {
            updated_range: format!("{}!A{}:E{}", title, sheet.len(), sheet.len()),
            updated_rows: 1,
        })
    }
}

fn header() -> Vec<String> {
    HEADER_ROW.iter().map(|c| c.to_string()).collect()
}

fn sample_row() -> RowRecord {
    RowRecord {
        date: "2026-08-07".to_string(),
        time: "12:00".to_string(),
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        description: String::new(),
    }
}

/// Provisioning a missing sheet writes the header row
#[tokio::test]
async fn test_ensure_sheet_creates_header() {
    let backend = InMemorySheets::default();

    ensure_sheet(&backend, "Calendar").await.unwrap();

    let rows = backend.rows("Calendar").await.unwrap();
    assert_eq!(rows, vec![header()]);
}

/// A second ensure call finds the sheet instead of recreating it
#[tokio::test]
async fn test_ensure_sheet_is_idempotent() {
    let backend = InMemorySheets::default();

    ensure_sheet(&backend, "Calendar").await.unwrap();
    ensure_sheet(&backend, "Calendar").await.unwrap();

    let rows = backend.rows("Calendar").await.unwrap();
    assert_eq!(rows.len(), 1, "Expected exactly one header row");
    assert_eq!(rows[0], header());
}

/// Appended rows land after the header in arrival order
#[tokio::test]
async fn test_append_after_ensure() {
    let backend = InMemorySheets::default();

    ensure_sheet(&backend, "Calendar").await.unwrap();
    let outcome = backend.append_row("Calendar", sample_row()).await.unwrap();

    assert_eq!(outcome.updated_rows, 1);
    assert_eq!(outcome.updated_range, "Calendar!A2:E2");

    let rows = backend.rows("Calendar").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[1],
        vec!["2026-08-07", "12:00", "Jane Doe", "jane@example.com", ""]
    );
}

/// Title matching is exact
#[tokio::test]
async fn test_find_sheet_missing() {
    let backend = InMemorySheets::default();

    ensure_sheet(&backend, "Calendar").await.unwrap();

    assert!(backend.find_sheet("Calendar").await.unwrap().is_some());
    assert!(backend.find_sheet("calendar").await.unwrap().is_none());
    assert!(backend.find_sheet("Bookings").await.unwrap().is_none());
}

/// Two racing provision attempts: the backend rejects the duplicate title
#[tokio::test]
async fn test_duplicate_add_sheet_is_rejected() {
    let backend = InMemorySheets::default();

    backend.add_sheet("Calendar").await.unwrap();
    let err = backend.add_sheet("Calendar").await.unwrap_err();

    assert!(err.to_string().contains("already exists"));
}
