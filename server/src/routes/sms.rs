//! SMS endpoints - send a diagnosis report, or a test message

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use dermasense::notify::{DeliveryStatus, ReportSummary, TEST_MESSAGE};

use crate::state::SharedState;

/// Shortest phone string accepted before any normalization
pub const MIN_PHONE_LENGTH: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SendSmsRequest {
    pub phone: Option<String>,
    pub disease: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub treatment: String,
}

#[derive(Debug, Serialize)]
pub struct SmsResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

impl From<&DeliveryStatus> for SmsResponse {
    fn from(delivery: &DeliveryStatus) -> Self {
        Self {
            status: if delivery.is_success() { "success" } else { "error" },
            message: delivery.message().to_string(),
            sid: delivery.sid().map(str::to_string),
        }
    }
}

fn sms_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": "error", "message": message }))).into_response()
}

/// POST /send_sms - JSON `{phone, disease, description?, treatment?}`
pub async fn send_sms(
    State(state): State<SharedState>,
    payload: Result<Json<SendSmsRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return sms_error(StatusCode::BAD_REQUEST, "No data received");
    };

    let phone = match request.phone {
        Some(phone) if phone.len() >= MIN_PHONE_LENGTH => phone,
        _ => return sms_error(StatusCode::BAD_REQUEST, "Valid phone number is required"),
    };

    let summary = ReportSummary {
        disease: request.disease.unwrap_or_else(|| "Unknown".to_string()),
        description: request.description,
        treatment: request.treatment,
    };

    info!("SMS report requested for {}", summary.disease);
    let delivery = state.sms.notify(&summary, &phone).await;
    if !delivery.is_success() {
        warn!("SMS report not delivered: {:?}", delivery);
    }

    Json(SmsResponse::from(&delivery)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct TestSmsForm {
    pub phone: Option<String>,
}

const TEST_SMS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Test SMS - DermaSense.ai</title></head>
<body style="font-family: Arial, sans-serif; max-width: 600px; margin: 50px auto; padding: 20px;">
    <h2>Test SMS Functionality</h2>
    <p><strong>Note:</strong> Trial accounts can only send SMS to verified phone numbers.</p>
    <form method="POST">
        <input type="tel" name="phone" placeholder="Enter phone number (+919876543210)" required style="padding: 10px; width: 300px; margin: 10px 0;">
        <br>
        <button type="submit" style="padding: 10px 20px;">Test SMS</button>
    </form>
</body>
</html>"#;

/// GET /test_sms - form for sending a test message
pub async fn test_sms_page() -> Html<&'static str> {
    Html(TEST_SMS_PAGE)
}

/// POST /test_sms - form field `phone`
pub async fn test_sms(
    State(state): State<SharedState>,
    Form(form): Form<TestSmsForm>,
) -> Response {
    let Some(phone) = form.phone.filter(|p| !p.trim().is_empty()) else {
        return sms_error(StatusCode::BAD_REQUEST, "Please enter a phone number");
    };

    let delivery = state.sms.notify_text(TEST_MESSAGE, Some(&phone)).await;
    Json(SmsResponse::from(&delivery)).into_response()
}
