//! Application state for the DermaSense server
//!
//! Everything a handler needs is built once in `main` and shared through an
//! `Arc`: the inference engine, the contact store and the SMS gateway.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use dermasense::contact::ContactStore;
use dermasense::inference::{Diagnoser, InferenceEngine};
use dermasense::notify::NotificationGateway;

/// Server configuration
#[derive(Clone, Debug, Serialize)]
pub struct ServerConfig {
    /// Directory holding the web pages (index.html, ...)
    pub static_dir: PathBuf,
    /// Directory uploaded images are written to and served from
    pub upload_dir: PathBuf,
    /// Model artifact the engine was loaded from
    pub model_path: PathBuf,
    /// Port the server listens on, reported by /debug
    pub port: u16,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            upload_dir: PathBuf::from("static/uploads"),
            model_path: PathBuf::from(dermasense::model::DEFAULT_MODEL_PATH),
            port: 5000,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Prediction pipeline; `None` when no model could be set up
    pub diagnoser: Option<Diagnoser>,
    /// Contact form storage; `None` when not configured
    pub contacts: Option<Arc<dyn ContactStore>>,
    /// SMS delivery
    pub sms: NotificationGateway,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            diagnoser: None,
            contacts: None,
            sms: NotificationGateway::disabled(),
            started_at: Instant::now(),
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn InferenceEngine>) -> Self {
        self.diagnoser = Some(Diagnoser::new(engine));
        self
    }

    pub fn with_contacts(mut self, contacts: Arc<dyn ContactStore>) -> Self {
        self.contacts = Some(contacts);
        self
    }

    pub fn with_sms(mut self, sms: NotificationGateway) -> Self {
        self.sms = sms;
        self
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;
