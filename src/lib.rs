//! # DermaSense
//!
//! A Rust library for skin lesion classification using the Burn framework.
//! It backs the `dermasense-server` HTTP service and the `dermasense` CLI.
//!
//! ## Features
//!
//! - **Degrading model loader**: trained artifact, then a rebuilt MobileNetV2
//!   classifier, then a minimal placeholder, so the service always starts
//! - **24 disease classes** with a descriptive record for each
//! - **SMS reports** of a diagnosis through an optional provider
//!
//! ## Modules
//!
//! - `knowledge`: class labels and disease records
//! - `model`: classifier architectures and the degradation-chain loader
//! - `inference`: preprocessing, the inference engine and the orchestrator
//! - `notify`: phone normalization, report formatting and SMS delivery
//! - `contact`: contact form storage
//! - `utils`: logging and error handling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dermasense::backend::{default_device, InferenceBackend};
//! use dermasense::inference::{BurnEngine, Diagnoser};
//! use dermasense::model::ModelLoader;
//!
//! let device = default_device();
//! let artifact = ModelLoader::new("model_checkpoint.mpk").load::<InferenceBackend>(&device);
//! let diagnoser = Diagnoser::new(Arc::new(BurnEngine::new(artifact, device)));
//! let diagnosis = diagnoser.diagnose("lesion.jpg".as_ref())?;
//! ```

pub mod backend;
pub mod contact;
pub mod inference;
pub mod knowledge;
pub mod model;
pub mod notify;
pub mod utils;

// Re-export commonly used items for convenience
pub use contact::{ContactMessage, ContactStore, JsonLinesStore, MemoryStore};
pub use inference::{BurnEngine, Diagnoser, Diagnosis, InferenceEngine, Prediction};
pub use knowledge::{DiseaseRecord, CLASS_LABELS, NUM_CLASSES};
pub use model::{ClassifierArtifact, ClassifierConfig, LoadTier, ModelLoader};
pub use notify::{DeliveryStatus, NotificationGateway, ReportSummary, SmsSettings};
pub use utils::error::{DermaError, Result};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
