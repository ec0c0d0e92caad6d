//! Twilio REST client for outbound SMS
//!
//! Only the Messages resource is used: one form-encoded `POST` per message,
//! authenticated with the account SID and auth token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::utils::error::{DermaError, Result};

/// Default Twilio API host
pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Narrow interface to an SMS provider
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Send `body` from `from` to `to`, returning the provider's message id.
    ///
    /// On failure the error carries the provider's own error text, which the
    /// gateway inspects to classify the outcome.
    async fn send(&self, body: &str, from: &str, to: &str) -> Result<String>;

    /// Account identifier, used to detect placeholder credentials
    fn account_id(&self) -> &str;
}

/// Account SID and auth token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl TwilioCredentials {
    /// Build credentials when both parts are present and non-empty
    pub fn from_parts(account_sid: Option<String>, auth_token: Option<String>) -> Option<Self> {
        let account_sid = account_sid.filter(|s| !s.trim().is_empty())?;
        let auth_token = auth_token.filter(|s| !s.trim().is_empty())?;
        Some(Self {
            account_sid,
            auth_token,
        })
    }
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: Option<u32>,
    message: String,
}

/// [`SmsProvider`] backed by the Twilio Messages API
pub struct TwilioProvider {
    client: Client,
    credentials: TwilioCredentials,
    base_url: String,
}

impl TwilioProvider {
    pub fn new(credentials: TwilioCredentials) -> Result<Self> {
        Self::with_base_url(credentials, TWILIO_API_BASE)
    }

    /// Point the client at another host (used against local mocks)
    pub fn with_base_url(credentials: TwilioCredentials, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DermaError::Sms(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.credentials.account_sid
        )
    }
}

#[async_trait]
impl SmsProvider for TwilioProvider {
    async fn send(&self, body: &str, from: &str, to: &str) -> Result<String> {
        let url = self.messages_url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&[("To", to), ("From", from), ("Body", body)])
            .send()
            .await
            .map_err(|e| DermaError::Sms(format!("Failed to reach Twilio: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DermaError::Sms(format!("Failed to read Twilio response: {}", e)))?;

        if !status.is_success() {
            return Err(DermaError::Sms(error_text(status.as_u16(), &text)));
        }

        let message: MessageResponse = serde_json::from_str(&text)
            .map_err(|e| DermaError::Sms(format!("Unexpected Twilio response: {}", e)))?;
        Ok(message.sid)
    }

    fn account_id(&self) -> &str {
        &self.credentials.account_sid
    }
}

/// Human readable error text from a Twilio error body
fn error_text(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            code: Some(code),
            message,
        }) => format!("HTTP {} error {}: {}", status, code, message),
        Ok(ErrorResponse { message, .. }) => format!("HTTP {}: {}", status, message),
        Err(_) => format!("HTTP {}: {}", status, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> TwilioCredentials {
        TwilioCredentials {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
        }
    }

    #[test]
    fn test_credentials_require_both_parts() {
        assert!(TwilioCredentials::from_parts(Some("AC1".into()), Some("tok".into())).is_some());
        assert!(TwilioCredentials::from_parts(Some("AC1".into()), None).is_none());
        assert!(TwilioCredentials::from_parts(None, Some("tok".into())).is_none());
        assert!(TwilioCredentials::from_parts(Some("  ".into()), Some("tok".into())).is_none());
    }

    #[test]
    fn test_messages_url() {
        let provider = TwilioProvider::with_base_url(credentials(), "http://localhost:9999/").unwrap();
        assert_eq!(
            provider.messages_url(),
            "http://localhost:9999/2010-04-01/Accounts/AC123/Messages.json"
        );
        assert_eq!(provider.account_id(), "AC123");
    }

    #[test]
    fn test_error_text_keeps_provider_message() {
        let body = r#"{"code": 21608, "message": "The number +15555550100 is unverified.", "status": 400}"#;
        let text = error_text(400, body);
        assert!(text.contains("21608"));
        assert!(text.contains("unverified"));

        assert_eq!(error_text(401, "Authenticate"), "HTTP 401: Authenticate");
    }
}
