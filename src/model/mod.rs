//! Model module for the skin lesion classifier using the Burn framework
//!
//! This module provides:
//! - The MobileNetV2 feature extractor and the dense classification head
//! - Model configuration and hyperparameters
//! - The loader that degrades from the trained artifact to simpler models
//!
//! ## Architecture
//!
//! The reference model is a frozen MobileNetV2 trunk followed by global
//! average pooling, dropout, a 1024-unit ReLU layer and a 24-way softmax.

pub mod classifier;
pub mod config;
pub mod loader;
pub mod mobilenet;

// Re-export main types for convenience
pub use classifier::{DermaClassifier, MinimalClassifier};
pub use config::ClassifierConfig;
pub use loader::{ClassifierArtifact, LoadTier, ModelLoader};
pub use mobilenet::MobileNetV2Features;

/// Default model artifact location
pub const DEFAULT_MODEL_PATH: &str = "model_checkpoint.mpk";
