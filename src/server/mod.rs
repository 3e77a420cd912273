mod handlers;

pub use handlers::{health_handler, record_appointment, webhook_handler};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::components::google_sheets::SheetsBackend;
use crate::config::Config;

/// Shared state available to request handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup
    pub config: Arc<Config>,
    /// Spreadsheet backend rows are appended to
    pub sheets: Arc<dyn SheetsBackend>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health_handler))
        .route("/health", get(handlers::health_handler))
        .route("/webhook", post(handlers::webhook_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
