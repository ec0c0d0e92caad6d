//! Inference module for skin lesion prediction
//!
//! This module provides:
//! - Image preprocessing into the model's input tensor
//! - The inference engine trait and its Burn implementation
//! - The orchestrator that turns an image path into a [`Diagnosis`]
//!
//! ## Failure handling
//!
//! Preprocessing errors are reported to the caller. Errors inside the model
//! are absorbed by the orchestrator, which substitutes the fallback label.

pub mod diagnose;
pub mod engine;
pub mod preprocess;

// Re-export main types for convenience
pub use diagnose::{Diagnoser, Diagnosis, FALLBACK_CONFIDENCE};
pub use engine::{argmax_first, BurnEngine, InferenceEngine, Prediction};
pub use preprocess::{preprocess, preprocess_image, ImageTensor, INPUT_SIZE};
