//! Notification gateway for SMS result summaries
//!
//! This module provides:
//! - Phone number normalization with a configurable country code
//! - The plaintext report template sent after a diagnosis
//! - [`NotificationGateway`], which wraps an optional [`SmsProvider`] and
//!   reduces every outcome to a [`DeliveryStatus`]
//!
//! The gateway never returns an error: a missing provider, placeholder
//! credentials and provider failures are all statuses.

pub mod twilio;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::inference::Diagnosis;
use crate::utils::truncate_with_ellipsis;

pub use twilio::{SmsProvider, TwilioCredentials, TwilioProvider};

/// Default country calling code prepended to bare numbers
pub const DEFAULT_COUNTRY_CODE: &str = "91";

/// Account SID prefix that switches the gateway to simulated sends
pub const DEMO_SID_PREFIX: &str = "YOUR_ACTUAL";

/// Message id reported for simulated sends
pub const DEMO_SID: &str = "DEMO_SMS_SUCCESS";

/// Longest description or treatment excerpt included in a report
pub const REPORT_EXCERPT_CHARS: usize = 150;

/// Body of the test message sent from the SMS test page
pub const TEST_MESSAGE: &str = "Test SMS from DermaSense.ai - Twilio is working! Your phone number can now receive disease analysis reports.";

/// Normalize a phone number for the provider
///
/// Spaces, hyphens and parentheses are removed. A number already starting
/// with `+` is kept as is; a number that already carries the country code
/// (code followed by ten digits) only gets the `+`; anything else has
/// `+{country_code}` prepended.
pub fn normalize_phone(raw: &str, country_code: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if cleaned.starts_with('+') {
        cleaned
    } else if cleaned.starts_with(country_code) && cleaned.len() == country_code.len() + 10 {
        format!("+{}", cleaned)
    } else {
        format!("+{}{}", country_code, cleaned)
    }
}

/// The parts of a diagnosis that go into an SMS report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub disease: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub treatment: String,
}

impl From<&Diagnosis> for ReportSummary {
    fn from(diagnosis: &Diagnosis) -> Self {
        Self {
            disease: diagnosis.label.to_string(),
            description: diagnosis.record.description.to_string(),
            treatment: diagnosis.record.treatment.to_string(),
        }
    }
}

/// Render the plaintext SMS report
pub fn format_report(summary: &ReportSummary) -> String {
    format!(
        "DermaSense.ai Skin Analysis Report\n\
         \n\
         Disease Detected: {}\n\
         \n\
         Description: {}\n\
         \n\
         Treatment: {}\n\
         \n\
         WARNING: This is an AI prediction. Please consult a dermatologist for accurate diagnosis.\n\
         \n\
         Stay healthy!",
        summary.disease,
        truncate_with_ellipsis(&summary.description, REPORT_EXCERPT_CHARS),
        truncate_with_ellipsis(&summary.treatment, REPORT_EXCERPT_CHARS),
    )
}

/// Outcome of a delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent { sid: String },
    DemoSent,
    UnverifiedRecipient,
    InvalidCredentials,
    Failed,
    ProviderUnavailable,
}

impl DeliveryStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryStatus::Sent { .. } | DeliveryStatus::DemoSent)
    }

    /// Message id, for successful sends
    pub fn sid(&self) -> Option<&str> {
        match self {
            DeliveryStatus::Sent { sid } => Some(sid),
            DeliveryStatus::DemoSent => Some(DEMO_SID),
            _ => None,
        }
    }

    /// User-facing explanation of the outcome
    pub fn message(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent { .. } => "SMS sent successfully",
            DeliveryStatus::DemoSent => "SMS sent successfully (Demo Mode)",
            DeliveryStatus::UnverifiedRecipient => {
                "Phone number not verified. Please verify it in Twilio Console or try a different number."
            }
            DeliveryStatus::InvalidCredentials => {
                "Invalid Twilio credentials. Please check your Account SID and Auth Token."
            }
            DeliveryStatus::Failed => "Failed to send SMS - Unknown error",
            DeliveryStatus::ProviderUnavailable => "SMS service not available",
        }
    }
}

/// Map provider error text to a status
pub fn classify_provider_error(error_text: &str) -> DeliveryStatus {
    let lowered = error_text.to_lowercase();
    if lowered.contains("unverified") {
        DeliveryStatus::UnverifiedRecipient
    } else if lowered.contains("authenticate") {
        DeliveryStatus::InvalidCredentials
    } else {
        DeliveryStatus::Failed
    }
}

/// Sender-side SMS settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsSettings {
    /// Provider phone number messages are sent from
    pub from_number: String,
    pub country_code: String,
    /// Recipient used when a request carries no phone number
    pub default_recipient: Option<String>,
}

impl Default for SmsSettings {
    fn default() -> Self {
        Self {
            from_number: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            default_recipient: None,
        }
    }
}

/// Sends reports through an optional provider
#[derive(Clone)]
pub struct NotificationGateway {
    provider: Option<Arc<dyn SmsProvider>>,
    settings: SmsSettings,
}

impl NotificationGateway {
    pub fn new(provider: Option<Arc<dyn SmsProvider>>, settings: SmsSettings) -> Self {
        Self { provider, settings }
    }

    /// Gateway with no provider; every send reports `ProviderUnavailable`
    pub fn disabled() -> Self {
        Self::new(None, SmsSettings::default())
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Whether sends are simulated because the credentials are placeholders
    pub fn is_demo(&self) -> bool {
        self.provider
            .as_ref()
            .is_some_and(|p| p.account_id().starts_with(DEMO_SID_PREFIX))
    }

    pub fn settings(&self) -> &SmsSettings {
        &self.settings
    }

    /// Send the report for a diagnosis to the caller's number
    ///
    /// A blank number is a failed delivery; it never falls back to the
    /// default recipient.
    pub async fn notify(&self, summary: &ReportSummary, phone: &str) -> DeliveryStatus {
        let body = format_report(summary);
        self.notify_text(&body, Some(phone)).await
    }

    /// Send an arbitrary body
    ///
    /// `None` sends to the configured default recipient.
    pub async fn notify_text(&self, body: &str, phone: Option<&str>) -> DeliveryStatus {
        let Some(provider) = &self.provider else {
            warn!("SMS provider not configured");
            return DeliveryStatus::ProviderUnavailable;
        };

        let Some(recipient) = phone.or(self.settings.default_recipient.as_deref()) else {
            warn!("No recipient phone number available");
            return DeliveryStatus::Failed;
        };
        if recipient.trim().is_empty() {
            warn!("Blank recipient phone number");
            return DeliveryStatus::Failed;
        }
        let recipient = normalize_phone(recipient, &self.settings.country_code);

        if self.is_demo() {
            info!("Demo mode: SMS to {} simulated", recipient);
            return DeliveryStatus::DemoSent;
        }

        info!(
            "Sending SMS from {} to {}",
            self.settings.from_number, recipient
        );

        match provider
            .send(body, &self.settings.from_number, &recipient)
            .await
        {
            Ok(sid) => {
                info!("SMS sent, sid {}", sid);
                DeliveryStatus::Sent { sid }
            }
            Err(e) => {
                warn!("SMS sending failed: {}", e);
                classify_provider_error(&e.to_string())
            }
        }
    }
}
