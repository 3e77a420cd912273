use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::ServiceAccountKey;
use crate::error::{google_sheets_error, BridgeResult};

/// OAuth scope limited to spreadsheet read/write
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Seconds before expiry at which a cached token is considered stale
const EXPIRY_MARGIN: i64 = 60;

/// Claims of the service account JWT assertion
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

/// Mints and caches access tokens for the service account
#[derive(Clone)]
pub struct TokenManager {
    key: Arc<ServiceAccountKey>,
    client: Client,
    cached: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenManager {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key: Arc::new(key),
            client: Client::new(),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Get an access token, either from the cache or by requesting a new one
    pub async fn get_token(&self) -> BridgeResult<String> {
        let now = Utc::now().timestamp();

        {
            let cached = self.cached.read().await;
            if let Some(token) = &*cached {
                if token.expires_at - EXPIRY_MARGIN > now {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let token = self.request_token(now).await?;
        let access_token = token.access_token.clone();
        *self.cached.write().await = Some(token);

        Ok(access_token)
    }

    /// Request a fresh token from the OAuth endpoint using a signed JWT assertion
    async fn request_token(&self, now: i64) -> BridgeResult<CachedToken> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + 3600,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| {
                google_sheets_error(&format!("Invalid service account private key: {}", e))
            })?;

        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| google_sheets_error(&format!("Failed to sign token assertion: {}", e)))?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_sheets_error(&format!("Failed to request access token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_sheets_error(&format!(
                "Failed to request access token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token_response: serde_json::Value = response
            .json()
            .await
            .map_err(|e| google_sheets_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = token_response
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| google_sheets_error("Token response missing 'access_token' field"))?
            .to_string();

        let expires_in = token_response
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);

        Ok(CachedToken {
            access_token,
            expires_at: now + expires_in,
        })
    }
}
