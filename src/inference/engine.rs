//! Inference Engine
//!
//! Runs a loaded [`ClassifierArtifact`] on a preprocessed image and reduces the
//! probability vector to a class index and a confidence percentage.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use burn::tensor::{backend::Backend, Tensor, TensorData};
use serde::Serialize;
use tracing::debug;

use super::preprocess::ImageTensor;
use crate::knowledge::NUM_CLASSES;
use crate::model::{ClassifierArtifact, LoadTier};
use crate::utils::error::{DermaError, Result};

/// Outcome of a single forward pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Index into the class-label table
    pub class_index: usize,
    /// `100 * max(probabilities)`, in `[0, 100]`
    pub confidence: f64,
}

/// Anything that can turn an image tensor into a prediction
pub trait InferenceEngine: Send + Sync {
    fn predict(&self, image: &ImageTensor) -> Result<Prediction>;

    /// Tier of the model behind the engine
    fn tier(&self) -> LoadTier;

    fn num_classes(&self) -> usize;
}

/// Index of the largest value; ties resolve to the lowest index
pub fn argmax_first(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if v <= best_value => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Reduce a probability vector to a [`Prediction`]
///
/// Rejects vectors whose length differs from `expected_classes` so that a
/// mismatched model can never be silently mislabelled.
pub fn prediction_from_probabilities(
    probabilities: &[f32],
    expected_classes: usize,
) -> Result<Prediction> {
    if probabilities.len() != expected_classes {
        return Err(DermaError::Inference(format!(
            "model produced {} probabilities, expected {}",
            probabilities.len(),
            expected_classes
        )));
    }

    if probabilities.iter().any(|p| !p.is_finite()) {
        return Err(DermaError::Inference(
            "model produced non-finite probabilities".to_string(),
        ));
    }

    let class_index = argmax_first(probabilities)
        .ok_or_else(|| DermaError::Inference("empty probability vector".to_string()))?;

    let confidence = (probabilities[class_index] as f64 * 100.0).clamp(0.0, 100.0);

    Ok(Prediction {
        class_index,
        confidence,
    })
}

/// Burn-backed engine owning the loaded artifact
pub struct BurnEngine<B: Backend> {
    artifact: Mutex<ClassifierArtifact<B>>,
    device: B::Device,
    tier: LoadTier,
    num_classes: usize,
}

impl<B: Backend> BurnEngine<B> {
    pub fn new(artifact: ClassifierArtifact<B>, device: B::Device) -> Self {
        let tier = artifact.tier();
        let num_classes = artifact.num_classes();
        Self {
            artifact: Mutex::new(artifact),
            device,
            tier,
            num_classes,
        }
    }

    fn forward(&self, image: &ImageTensor) -> Result<Vec<f32>> {
        let artifact = self
            .artifact
            .lock()
            .map_err(|_| DermaError::Inference("model lock poisoned".to_string()))?;

        let [batch, height, width, channels] = image.shape();
        let input = Tensor::<B, 4>::from_floats(
            TensorData::new(image.as_slice().to_vec(), [batch, height, width, channels]),
            &self.device,
        )
        // NHWC -> NCHW
        .permute([0, 3, 1, 2]);

        let probabilities = catch_unwind(AssertUnwindSafe(|| artifact.forward_softmax(input)))
            .map_err(|_| DermaError::Inference("forward pass panicked".to_string()))?;

        probabilities
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| DermaError::Inference(format!("cannot read model output: {:?}", e)))
    }
}

impl<B: Backend> InferenceEngine for BurnEngine<B> {
    fn predict(&self, image: &ImageTensor) -> Result<Prediction> {
        let probabilities = self.forward(image)?;
        let prediction = prediction_from_probabilities(&probabilities, NUM_CLASSES)?;

        debug!(
            "Predicted class {} ({:.2}%) with {} model",
            prediction.class_index, prediction.confidence, self.tier
        );

        Ok(prediction)
    }

    fn tier(&self) -> LoadTier {
        self.tier
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }
}
