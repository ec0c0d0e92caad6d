//! Health check and service status endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use dermasense::backend::backend_name;
use dermasense::model::LoadTier;

use crate::state::SharedState;

/// GET /health - plain liveness probe
pub async fn health_check() -> &'static str {
    "OK"
}

#[derive(Serialize)]
pub struct DebugResponse {
    pub status: String,
    pub routes: Vec<&'static str>,
    pub model_loaded: bool,
    pub model_tier: Option<LoadTier>,
    pub backend: &'static str,
    pub contacts: Option<String>,
    pub sms_available: bool,
    pub sms_demo_mode: bool,
    pub port: u16,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /debug - what the service is running with
pub async fn debug_status(State(state): State<SharedState>) -> Json<DebugResponse> {
    let model_tier = state.diagnoser.as_ref().map(|d| d.engine().tier());

    Json(DebugResponse {
        status: "DermaSense server is running".to_string(),
        routes: vec![
            "/",
            "/predict",
            "/send_sms",
            "/test_sms",
            "/contact",
            "/messages",
            "/debug",
            "/health",
        ],
        model_loaded: model_tier.is_some(),
        model_tier,
        backend: backend_name(),
        contacts: state.contacts.as_ref().map(|c| c.describe()),
        sms_available: state.sms.is_available(),
        sms_demo_mode: state.sms.is_demo(),
        port: state.config.port,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
