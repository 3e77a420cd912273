use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use super::AppState;
use crate::components::google_sheets::models::{
    AppendOutcome, AppointmentEvent, RowRecord, WebhookPayload,
};
use crate::components::google_sheets::{ensure_sheet, SheetsBackend};
use crate::error::BridgeResult;

/// Handler for the health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "Webhook-to-spreadsheet bridge is running"
}

/// Handler for incoming appointment webhooks
pub async fn webhook_handler(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> impl IntoResponse {
    let event = match AppointmentEvent::from_payload(payload) {
        Ok(event) => event,
        Err(e) => {
            info!("Rejected webhook payload: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            );
        }
    };

    match record_appointment(state.sheets.as_ref(), &state.config.sheet_name, &event).await {
        Ok(outcome) => {
            info!(
                "Appended appointment for {} to {}",
                event.email, outcome.updated_range
            );
            (
                StatusCode::OK,
                Json(json!({ "success": true, "message": "Event added to calendar" })),
            )
        }
        Err(e) => {
            // Full detail stays in the server log; the caller gets the wrapped message
            error!("Failed to record appointment: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error", "details": e.to_string() })),
            )
        }
    }
}

/// Make sure the target sheet exists, then append the appointment as one row
pub async fn record_appointment(
    backend: &dyn SheetsBackend,
    sheet_name: &str,
    event: &AppointmentEvent,
) -> BridgeResult<AppendOutcome> {
    ensure_sheet(backend, sheet_name).await?;

    let row = RowRecord::from_event(event, Utc::now().date_naive());
    backend.append_row(sheet_name, row).await
}
