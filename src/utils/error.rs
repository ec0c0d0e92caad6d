//! Error Handling Module
//!
//! Defines the error type shared by the DermaSense library and binaries.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for DermaSense operations
#[derive(Error, Debug)]
pub enum DermaError {
    /// The image file was not present when preprocessing started
    #[error("Image file not found: {0}")]
    ImageNotFound(PathBuf),

    /// The file exists but could not be decoded as an image
    #[error("Failed to decode image at '{path}': {message}")]
    ImageDecode { path: PathBuf, message: String },

    /// The forward pass or its output was unusable
    #[error("Inference error: {0}")]
    Inference(String),

    /// A tier of the model loader failed
    #[error("Model load error ({tier}): {message}")]
    ModelLoad { tier: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input from a caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Contact storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// SMS provider failure, carrying the provider's error text
    #[error("SMS error: {0}")]
    Sms(String),
}

impl DermaError {
    /// Whether the error was caused by what the caller sent rather than by the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, DermaError::InvalidInput(_))
    }
}

impl From<serde_json::Error> for DermaError {
    fn from(err: serde_json::Error) -> Self {
        DermaError::Serialization(err.to_string())
    }
}

/// Convenience Result type for DermaSense operations
pub type Result<T> = std::result::Result<T, DermaError>;
