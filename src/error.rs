use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(sheetbridge::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(sheetbridge::config))]
    Config(String),

    /// Client-caused payload rejection; the message is surfaced verbatim as HTTP 400
    #[error("{0}")]
    #[diagnostic(code(sheetbridge::validation))]
    Validation(String),

    #[error("Google Sheets API error: {0}")]
    #[diagnostic(code(sheetbridge::google_sheets))]
    GoogleSheets(String),

    #[error(transparent)]
    #[diagnostic(code(sheetbridge::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(sheetbridge::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(sheetbridge::other))]
    Other(String),
}

// Implement From for JSON serialization errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BridgeResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create Google Sheets errors
pub fn google_sheets_error(message: &str) -> Error {
    Error::GoogleSheets(message.to_string())
}

/// Helper to create other errors
#[allow(dead_code)]
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
