//! cairn-auth — security-token client.
//!
//! Fetches short-lived app tokens from the external security service over
//! HTTP. Token issuance and validation are that service's concern; this
//! client performs exactly one acquire per call, with no caching or renewal.

mod error;

pub use error::AuthError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cairn_core::SecurityToken;

/// Configuration for the security client.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Base URL of the security service.
    pub endpoint: String,
    /// Security identifier this application is registered under.
    pub security_id: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// HTTP client for the security service.
#[derive(Clone)]
pub struct SecurityClient {
    config: SecurityConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TokenRequest {
    app_id: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
    app_id: String,
    issued_at: DateTime<Utc>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl SecurityClient {
    pub fn new(config: SecurityConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        Ok(Self {
            config: SecurityConfig {
                endpoint: config.endpoint.trim_end_matches('/').to_string(),
                ..config
            },
            client,
        })
    }

    /// Fetch a fresh app token asserting this application's identity.
    pub async fn fetch_app_token(&self) -> Result<SecurityToken, AuthError> {
        let request = TokenRequest {
            app_id: self.config.security_id.clone(),
        };

        let response = self
            .client
            .post(format!("{}/token/app", self.config.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Denied(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        tracing::info!(app_id = %parsed.app_id, "Fetched app token");
        Ok(SecurityToken {
            token: parsed.token,
            app_id: parsed.app_id,
            issued_at: parsed.issued_at,
            expires_at: parsed.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let client = SecurityClient::new(SecurityConfig {
            endpoint: "http://security:7171/".to_string(),
            security_id: "client".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.config.endpoint, "http://security:7171");
    }

    #[test]
    fn token_response_deserializes_without_expiry() {
        let parsed: TokenResponse = serde_json::from_str(
            r#"{"token": "t-1", "app_id": "client", "issued_at": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(parsed.token, "t-1");
        assert_eq!(parsed.app_id, "client");
        assert!(parsed.expires_at.is_none());
    }

    #[tokio::test]
    async fn unreachable_service_is_a_connection_error() {
        let client = SecurityClient::new(SecurityConfig {
            // Reserved TEST-NET address; nothing listens there.
            endpoint: "http://192.0.2.1:1".to_string(),
            security_id: "client".to_string(),
            timeout_secs: 1,
        })
        .unwrap();

        let err = client.fetch_app_token().await.unwrap_err();
        assert!(matches!(err, AuthError::Connection(_)));
    }
}
