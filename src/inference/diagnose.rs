//! Prediction orchestration: preprocess, infer, resolve the disease record.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::engine::InferenceEngine;
use super::preprocess::preprocess;
use crate::knowledge::{self, DiseaseRecord, FALLBACK_LABEL};
use crate::utils::error::Result;

/// Confidence reported when inference fails and the fallback label is used
pub const FALLBACK_CONFIDENCE: f64 = 50.0;

/// Result of diagnosing one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub label: &'static str,
    /// Percentage in `[0, 100]`
    pub confidence: f64,
    pub record: DiseaseRecord,
    pub image_path: PathBuf,
    /// True when the label is the fallback substituted after an inference failure
    pub degraded: bool,
}

/// Ties the preprocessor, the engine and the knowledge base together
#[derive(Clone)]
pub struct Diagnoser {
    engine: Arc<dyn InferenceEngine>,
}

impl Diagnoser {
    pub fn new(engine: Arc<dyn InferenceEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<dyn InferenceEngine> {
        &self.engine
    }

    /// Diagnose the image at `path`.
    ///
    /// Missing or undecodable images are errors. A failure inside the model is
    /// not: it yields the fallback label with [`FALLBACK_CONFIDENCE`].
    pub fn diagnose(&self, path: &Path) -> Result<Diagnosis> {
        let image = preprocess(path)?;

        let (label, confidence, degraded) = match self.engine.predict(&image) {
            Ok(prediction) => match knowledge::class_label(prediction.class_index) {
                Some(label) => (label, prediction.confidence, false),
                None => {
                    warn!("Class index {} has no label", prediction.class_index);
                    (FALLBACK_LABEL, FALLBACK_CONFIDENCE, true)
                }
            },
            Err(e) => {
                warn!("Inference failed for {:?}: {}", path, e);
                (FALLBACK_LABEL, FALLBACK_CONFIDENCE, true)
            }
        };

        info!("Diagnosis for {:?}: {} ({:.2}%)", path, label, confidence);

        Ok(Diagnosis {
            label,
            confidence,
            record: knowledge::lookup(label),
            image_path: path.to_path_buf(),
            degraded,
        })
    }
}
