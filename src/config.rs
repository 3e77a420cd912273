use crate::error::{config_error, env_error, BridgeResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Default sheet title used when SHEET_NAME is not set
pub const DEFAULT_SHEET_NAME: &str = "Calendar";

/// Default port the HTTP server listens on
pub const DEFAULT_PORT: u16 = 3000;

/// Google service account credentials used to authenticate to the Sheets API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account email address
    pub client_email: String,
    /// PEM-encoded RSA private key
    pub private_key: String,
    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    String::from("https://oauth2.googleapis.com/token")
}

/// Main configuration structure for the bridge
#[derive(Debug, Clone)]
pub struct Config {
    /// Identifier of the spreadsheet rows are appended to
    pub spreadsheet_id: String,
    /// Title of the target sheet within the spreadsheet
    pub sheet_name: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Credentials for the spreadsheet backend
    pub service_account: ServiceAccountKey,
}

impl Config {
    /// Load configuration from the environment
    pub fn load() -> BridgeResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let spreadsheet_id =
            env::var("SPREADSHEET_ID").map_err(|_| env_error("SPREADSHEET_ID"))?;

        // Optional values with defaults
        let sheet_name =
            env::var("SHEET_NAME").unwrap_or_else(|_| String::from(DEFAULT_SHEET_NAME));

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let service_account = Self::load_service_account()?;

        Ok(Config {
            spreadsheet_id,
            sheet_name,
            port,
            service_account,
        })
    }

    /// Read the service account key, either inline from the environment or from a file
    fn load_service_account() -> BridgeResult<ServiceAccountKey> {
        let raw = if let Ok(json) = env::var("GOOGLE_SERVICE_ACCOUNT_KEY") {
            json
        } else if let Ok(path) = env::var("GOOGLE_SERVICE_ACCOUNT_KEY_FILE") {
            fs::read_to_string(&path)?
        } else {
            return Err(env_error("GOOGLE_SERVICE_ACCOUNT_KEY"));
        };

        let key: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| config_error(&format!("Invalid service account key: {}", e)))?;

        if key.client_email.is_empty() || key.private_key.is_empty() {
            return Err(config_error(
                "Service account key is missing client_email or private_key",
            ));
        }

        Ok(key)
    }
}
