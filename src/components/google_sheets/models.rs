use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{validation_error, BridgeResult};

/// The only event type the bridge accepts
pub const SCHEDULE_APPOINTMENT: &str = "schedule_appointment";

/// Header row written into a freshly provisioned sheet
pub const HEADER_ROW: [&str; 5] = ["Date", "Time", "Name", "Email", "Description"];

/// Time used when the payload does not carry one
pub const DEFAULT_TIME: &str = "12:00";

/// Raw webhook body as received, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub data: Option<AppointmentData>,
}

/// Appointment fields inside the webhook body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A validated appointment notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentEvent {
    pub name: String,
    pub email: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
}

impl AppointmentEvent {
    /// Validate a webhook payload into an appointment event.
    ///
    /// Only presence is checked; values are passed through as uninterpreted
    /// strings, so a malformed email or date is accepted here.
    pub fn from_payload(payload: WebhookPayload) -> BridgeResult<Self> {
        let (event, data) = match (payload.event, payload.data) {
            (Some(event), Some(data)) => (event, data),
            _ => return Err(validation_error("Missing event or data")),
        };

        if event != SCHEDULE_APPOINTMENT {
            return Err(validation_error("Unsupported event type"));
        }

        let name = data.name.filter(|n| !n.is_empty());
        let email = data.email.filter(|e| !e.is_empty());
        let (name, email) = match (name, email) {
            (Some(name), Some(email)) => (name, email),
            _ => return Err(validation_error("Missing required fields")),
        };

        Ok(AppointmentEvent {
            name,
            email,
            date: data.date,
            time: data.time,
            description: data.description,
        })
    }
}

/// One spreadsheet row, in column order Date, Time, Name, Email, Description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: String,
    pub description: String,
}

impl RowRecord {
    /// Build a fully populated row from an event, filling in defaults for
    /// the optional fields
    pub fn from_event(event: &AppointmentEvent, fallback_date: NaiveDate) -> Self {
        Self {
            date: event
                .date
                .clone()
                .unwrap_or_else(|| fallback_date.format("%Y-%m-%d").to_string()),
            time: event.time.clone().unwrap_or_else(|| DEFAULT_TIME.to_string()),
            name: event.name.clone(),
            email: event.email.clone(),
            description: event.description.clone().unwrap_or_default(),
        }
    }

    /// Cells in sheet column order
    pub fn into_cells(self) -> Vec<String> {
        vec![self.date, self.time, self.name, self.email, self.description]
    }
}

/// Update metadata returned by an append
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppendOutcome {
    /// Range the row was written to, e.g. "Calendar!A2:E2"
    pub updated_range: String,
    /// Number of rows written
    pub updated_rows: u32,
}
