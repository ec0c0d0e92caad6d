//! Model loading with a degradation chain
//!
//! [`ModelLoader::load`] always produces a runnable classifier. It walks three
//! tiers in order and returns the first one that succeeds:
//!
//! 1. **Trained** - the serialized artifact deserialized into the reference
//!    architecture (parameters only, no optimizer state).
//! 2. **Rebuilt** - the reference architecture rebuilt from scratch on top of
//!    pretrained MobileNetV2 features; the classification head is untrained.
//! 3. **Minimal** - a tiny placeholder model whose predictions are not
//!    meaningful.
//!
//! Every tier failure is logged so operators can see when the service runs on
//! a degraded model.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use burn::{
    module::Module,
    record::CompactRecorder,
    tensor::{backend::Backend, Tensor},
};
use serde::Serialize;
use tracing::{info, warn};

use super::classifier::{DermaClassifier, MinimalClassifier};
use super::config::ClassifierConfig;
use super::mobilenet::MobileNetV2Features;
use crate::knowledge::NUM_CLASSES;
use crate::utils::error::{DermaError, Result};

/// Which step of the degradation chain produced the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadTier {
    Trained,
    Rebuilt,
    Minimal,
}

impl LoadTier {
    /// Whether predictions from this tier reflect learned weights
    pub fn is_meaningful(&self) -> bool {
        matches!(self, LoadTier::Trained)
    }
}

impl fmt::Display for LoadTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadTier::Trained => write!(f, "trained"),
            LoadTier::Rebuilt => write!(f, "rebuilt"),
            LoadTier::Minimal => write!(f, "minimal"),
        }
    }
}

/// A ready-to-use classifier, tagged with the tier that built it
#[derive(Debug)]
pub enum ClassifierArtifact<B: Backend> {
    Trained(DermaClassifier<B>),
    Rebuilt(DermaClassifier<B>),
    Minimal(MinimalClassifier<B>),
}

impl<B: Backend> ClassifierArtifact<B> {
    pub fn tier(&self) -> LoadTier {
        match self {
            ClassifierArtifact::Trained(_) => LoadTier::Trained,
            ClassifierArtifact::Rebuilt(_) => LoadTier::Rebuilt,
            ClassifierArtifact::Minimal(_) => LoadTier::Minimal,
        }
    }

    /// Width of the final layer, i.e. the length of every probability vector
    pub fn num_classes(&self) -> usize {
        match self {
            ClassifierArtifact::Trained(model) | ClassifierArtifact::Rebuilt(model) => {
                model.output_width()
            }
            ClassifierArtifact::Minimal(model) => model.output_width(),
        }
    }

    /// Forward pass returning class probabilities of shape [batch_size, num_classes]
    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        match self {
            ClassifierArtifact::Trained(model) | ClassifierArtifact::Rebuilt(model) => {
                model.forward_softmax(x)
            }
            ClassifierArtifact::Minimal(model) => model.forward_softmax(x),
        }
    }
}

/// Builds a [`ClassifierArtifact`] from an artifact path and optional backbone weights
#[derive(Debug, Clone)]
pub struct ModelLoader {
    artifact_path: PathBuf,
    backbone_path: Option<PathBuf>,
    config: ClassifierConfig,
}

impl ModelLoader {
    /// Create a loader for the given artifact (burn `CompactRecorder` file)
    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            backbone_path: None,
            config: ClassifierConfig::new(),
        }
    }

    /// Pretrained MobileNetV2 feature weights used by the rebuild tier
    pub fn with_backbone(mut self, backbone_path: Option<PathBuf>) -> Self {
        self.backbone_path = backbone_path;
        self
    }

    /// Override the architecture hyper-parameters
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Produce a classifier, degrading through the tiers instead of failing
    pub fn load<B: Backend>(&self, device: &B::Device) -> ClassifierArtifact<B> {
        for tier in [LoadTier::Trained, LoadTier::Rebuilt] {
            info!("Attempting {} model tier", tier);

            match self.try_tier::<B>(tier, device) {
                Ok(artifact) => {
                    info!(
                        "Model ready ({} tier, {} classes)",
                        tier,
                        artifact.num_classes()
                    );
                    if !tier.is_meaningful() {
                        warn!("Classification head is untrained; predictions are not reliable");
                    }
                    return artifact;
                }
                Err(e) => warn!("{} tier failed: {}", tier, e),
            }
        }

        warn!("Using minimal model - predictions will be random but the service stays up");
        self.minimal(device)
    }

    /// Run one tier, turning panics from the backend into tier errors
    pub fn try_tier<B: Backend>(
        &self,
        tier: LoadTier,
        device: &B::Device,
    ) -> Result<ClassifierArtifact<B>> {
        self.config
            .validate()
            .map_err(|e| tier_error(tier, e.to_string()))?;

        let outcome = catch_unwind(AssertUnwindSafe(|| match tier {
            LoadTier::Trained => self.load_trained(device),
            LoadTier::Rebuilt => self.rebuild(device),
            LoadTier::Minimal => Ok(self.minimal(device)),
        }));

        let artifact = outcome.unwrap_or_else(|_| {
            Err(tier_error(tier, "backend panicked while building the model"))
        })?;

        let width = artifact.num_classes();
        if width != NUM_CLASSES {
            return Err(tier_error(
                tier,
                format!(
                    "output width {} does not match the {} class labels",
                    width, NUM_CLASSES
                ),
            ));
        }

        Ok(artifact)
    }

    /// Tier 1: deserialize the trained artifact
    fn load_trained<B: Backend>(&self, device: &B::Device) -> Result<ClassifierArtifact<B>> {
        if !self.artifact_path.exists() {
            return Err(tier_error(
                LoadTier::Trained,
                format!("artifact not found at {:?}", self.artifact_path),
            ));
        }

        let model = DermaClassifier::<B>::new(&self.config, device)
            .load_file(self.artifact_path.clone(), &CompactRecorder::new(), device)
            .map_err(|e| tier_error(LoadTier::Trained, format!("{:?}", e)))?;

        Ok(ClassifierArtifact::Trained(model))
    }

    /// Tier 2: reference architecture with pretrained features and a fresh head
    fn rebuild<B: Backend>(&self, device: &B::Device) -> Result<ClassifierArtifact<B>> {
        let backbone_path = self.backbone_path.as_ref().ok_or_else(|| {
            tier_error(LoadTier::Rebuilt, "no pretrained backbone weights configured")
        })?;

        if !backbone_path.exists() {
            return Err(tier_error(
                LoadTier::Rebuilt,
                format!("backbone weights not found at {:?}", backbone_path),
            ));
        }

        let backbone = MobileNetV2Features::<B>::new(device)
            .load_file(backbone_path.clone(), &CompactRecorder::new(), device)
            .map_err(|e| tier_error(LoadTier::Rebuilt, format!("{:?}", e)))?;

        let model = DermaClassifier::new(&self.config, device).with_backbone(backbone);
        Ok(ClassifierArtifact::Rebuilt(model))
    }

    /// Tier 3: placeholder model, cannot fail
    pub fn minimal<B: Backend>(&self, device: &B::Device) -> ClassifierArtifact<B> {
        ClassifierArtifact::Minimal(MinimalClassifier::new(&self.config, device))
    }
}

fn tier_error(tier: LoadTier, message: impl Into<String>) -> DermaError {
    DermaError::ModelLoad {
        tier: tier.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use tempfile::tempdir;

    type TestBackend = NdArray;

    #[test]
    fn test_missing_artifact_degrades_to_minimal() {
        let dir = tempdir().unwrap();
        let loader = ModelLoader::new(dir.path().join("missing.mpk"));

        let artifact = loader.load::<TestBackend>(&Default::default());

        assert_eq!(artifact.tier(), LoadTier::Minimal);
        assert_eq!(artifact.num_classes(), 24);
    }

    #[test]
    fn test_corrupt_artifact_still_yields_valid_model() {
        let dir = tempdir().unwrap();
        let artifact_path = dir.path().join("model_checkpoint.mpk");
        std::fs::write(&artifact_path, b"this is not a burn record").unwrap();

        let loader = ModelLoader::new(&artifact_path);
        let artifact = loader.load::<TestBackend>(&Default::default());

        assert_ne!(artifact.tier(), LoadTier::Trained);
        assert_eq!(artifact.num_classes(), 24);
    }

    #[test]
    fn test_corrupt_artifact_with_backbone_rebuilds() {
        let device = Default::default();
        let dir = tempdir().unwrap();

        let backbone_path = dir.path().join("mobilenet_v2_features.mpk");
        MobileNetV2Features::<TestBackend>::new(&device)
            .save_file(backbone_path.clone(), &CompactRecorder::new())
            .unwrap();

        let artifact_path = dir.path().join("model_checkpoint.mpk");
        std::fs::write(&artifact_path, [0u8; 64]).unwrap();

        let loader = ModelLoader::new(&artifact_path).with_backbone(Some(backbone_path));
        let artifact = loader.load::<TestBackend>(&device);

        assert_eq!(artifact.tier(), LoadTier::Rebuilt);
        assert_eq!(artifact.num_classes(), 24);
    }

    #[test]
    fn test_saved_classifier_loads_as_trained() {
        let device = Default::default();
        let dir = tempdir().unwrap();
        let artifact_path = dir.path().join("model_checkpoint.mpk");

        DermaClassifier::<TestBackend>::new(&ClassifierConfig::new(), &device)
            .save_file(artifact_path.clone(), &CompactRecorder::new())
            .unwrap();

        let artifact = ModelLoader::new(&artifact_path).load::<TestBackend>(&device);

        assert_eq!(artifact.tier(), LoadTier::Trained);
        assert!(artifact.tier().is_meaningful());
    }

    #[test]
    fn test_trained_tier_rejects_wrong_head_width() {
        let device = Default::default();
        let dir = tempdir().unwrap();
        let artifact_path = dir.path().join("model_checkpoint.mpk");

        let other = ClassifierConfig::new().with_num_classes(38);
        DermaClassifier::<TestBackend>::new(&other, &device)
            .save_file(artifact_path.clone(), &CompactRecorder::new())
            .unwrap();

        let result = ModelLoader::new(&artifact_path).try_tier::<TestBackend>(LoadTier::Trained, &device);
        assert!(result.is_err());
    }

    #[test]
    fn test_rebuild_without_backbone_fails() {
        let loader = ModelLoader::new("model_checkpoint.mpk");
        let result = loader.try_tier::<TestBackend>(LoadTier::Rebuilt, &Default::default());
        assert!(matches!(result, Err(DermaError::ModelLoad { .. })));
    }

    #[test]
    fn test_invalid_config_fails_tier() {
        let loader = ModelLoader::new("model_checkpoint.mpk")
            .with_config(ClassifierConfig::new().with_dropout_rate(1.5));
        let result = loader.try_tier::<TestBackend>(LoadTier::Minimal, &Default::default());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("dropout_rate"));
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(LoadTier::Trained.to_string(), "trained");
        assert_eq!(LoadTier::Minimal.to_string(), "minimal");
        assert!(!LoadTier::Rebuilt.is_meaningful());
    }
}
