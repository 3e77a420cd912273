use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use super::models::{AppendOutcome, RowRecord};
use super::token::TokenManager;
use super::SheetsBackend;
use crate::config::Config;
use crate::error::{google_sheets_error, BridgeResult};

/// Row count a freshly provisioned sheet is created with
const NEW_SHEET_ROWS: u32 = 1000;

/// Column count a freshly provisioned sheet is created with
const NEW_SHEET_COLUMNS: u32 = 10;

/// Google Sheets v4 client bound to a single spreadsheet
#[derive(Clone)]
pub struct GoogleSheetsClient {
    spreadsheet_id: String,
    token_manager: TokenManager,
    client: Client,
}

impl GoogleSheetsClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &Config) -> Self {
        Self {
            spreadsheet_id: config.spreadsheet_id.clone(),
            token_manager: TokenManager::new(config.service_account.clone()),
            client: Client::new(),
        }
    }

    fn base_url(&self) -> String {
        format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}",
            self.spreadsheet_id
        )
    }

    async fn bearer(&self) -> BridgeResult<String> {
        let token = self.token_manager.get_token().await?;
        Ok(format!("Bearer {}", token))
    }

    /// Read the response body as JSON, turning HTTP errors into descriptive messages
    async fn read_json(response: reqwest::Response, context: &str) -> BridgeResult<Value> {
        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_sheets_error(&format!(
                "{}: HTTP {} - {}",
                context, status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| google_sheets_error(&format!("{}: invalid response body: {}", context, e)))
    }
}

#[async_trait]
impl SheetsBackend for GoogleSheetsClient {
    async fn find_sheet(&self, title: &str) -> BridgeResult<Option<i64>> {
        let mut url = Url::parse(&self.base_url())
            .map_err(|e| google_sheets_error(&format!("Failed to parse URL: {}", e)))?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties");

        let response = self
            .client
            .get(url)
            .header("Authorization", self.bearer().await?)
            .send()
            .await
            .map_err(|e| {
                google_sheets_error(&format!("Failed to fetch spreadsheet metadata: {}", e))
            })?;

        let metadata = Self::read_json(response, "Failed to fetch spreadsheet metadata").await?;

        let sheets = metadata
            .get("sheets")
            .and_then(|s| s.as_array())
            .cloned()
            .unwrap_or_default();

        // Exact, case-sensitive title match
        for sheet in &sheets {
            let properties = sheet.get("properties");
            let sheet_title = properties
                .and_then(|p| p.get("title"))
                .and_then(|t| t.as_str());

            if sheet_title == Some(title) {
                let sheet_id = properties
                    .and_then(|p| p.get("sheetId"))
                    .and_then(|id| id.as_i64())
                    .ok_or_else(|| google_sheets_error("Sheet metadata missing sheet id"))?;
                return Ok(Some(sheet_id));
            }
        }

        Ok(None)
    }

    async fn add_sheet(&self, title: &str) -> BridgeResult<i64> {
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": {
                            "rowCount": NEW_SHEET_ROWS,
                            "columnCount": NEW_SHEET_COLUMNS,
                        }
                    }
                }
            }]
        });

        let response = self
            .client
            .post(format!("{}:batchUpdate", self.base_url()))
            .header("Authorization", self.bearer().await?)
            .json(&body)
            .send()
            .await
            .map_err(|e| google_sheets_error(&format!("Failed to add sheet: {}", e)))?;

        let reply = Self::read_json(response, "Failed to add sheet").await?;

        reply
            .get("replies")
            .and_then(|r| r.as_array())
            .and_then(|r| r.first())
            .and_then(|r| r.get("addSheet"))
            .and_then(|r| r.get("properties"))
            .and_then(|p| p.get("sheetId"))
            .and_then(|id| id.as_i64())
            .ok_or_else(|| google_sheets_error("Add sheet reply missing sheet id"))
    }

    async fn write_values(&self, range: &str, rows: Vec<Vec<String>>) -> BridgeResult<()> {
        let mut url = Url::parse(&format!("{}/values/{}", self.base_url(), range))
            .map_err(|e| google_sheets_error(&format!("Failed to parse URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        let body = json!({ "values": rows });

        let response = self
            .client
            .put(url)
            .header("Authorization", self.bearer().await?)
            .json(&body)
            .send()
            .await
            .map_err(|e| google_sheets_error(&format!("Failed to write values: {}", e)))?;

        Self::read_json(response, "Failed to write values").await?;

        Ok(())
    }

    async fn append_row(&self, title: &str, row: RowRecord) -> BridgeResult<AppendOutcome> {
        let mut url = Url::parse(&format!("{}/values/{}!A:E:append", self.base_url(), title))
            .map_err(|e| google_sheets_error(&format!("Failed to parse URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = json!({ "values": [row.into_cells()] });

        let response = self
            .client
            .post(url)
            .header("Authorization", self.bearer().await?)
            .json(&body)
            .send()
            .await
            .map_err(|e| google_sheets_error(&format!("Failed to append row: {}", e)))?;

        let reply = Self::read_json(response, "Failed to append row").await?;

        let updates = reply.get("updates");
        let updated_range = updates
            .and_then(|u| u.get("updatedRange"))
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .to_string();
        let updated_rows = updates
            .and_then(|u| u.get("updatedRows"))
            .and_then(|r| r.as_u64())
            .unwrap_or(0) as u32;

        Ok(AppendOutcome {
            updated_range,
            updated_rows,
        })
    }
}
