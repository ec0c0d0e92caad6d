//! Skin lesion classifier architectures
//!
//! Two architectures back the loader's tiers:
//! - [`DermaClassifier`]: frozen MobileNetV2 trunk, global average pooling,
//!   dropout, a 1024-unit ReLU layer and a softmax classification layer.
//!   This is the layout of the trained artifact.
//! - [`MinimalClassifier`]: global average pooling straight over the input
//!   image followed by two dense layers. It exists only so the service can
//!   start when nothing better is available; its outputs carry no meaning.

use burn::{
    module::Module,
    nn::{
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig},
        Dropout, DropoutConfig, Linear, LinearConfig, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

use super::config::ClassifierConfig;
use super::mobilenet::{MobileNetV2Features, FEATURE_CHANNELS};

/// Flatten `[batch, channels, 1, 1]` pooled maps to `[batch, channels]`
fn flatten_pooled<B: Backend>(x: Tensor<B, 4>) -> Tensor<B, 2> {
    let [batch_size, channels, _, _] = x.dims();
    x.reshape([batch_size, channels])
}

/// Reference classifier: MobileNetV2 features + dense head
#[derive(Module, Debug)]
pub struct DermaClassifier<B: Backend> {
    pub backbone: MobileNetV2Features<B>,
    pub global_pool: AdaptiveAvgPool2d,
    pub dropout: Dropout,
    pub fc1: Linear<B>,
    pub fc2: Linear<B>,
    num_classes: usize,
}

impl<B: Backend> DermaClassifier<B> {
    /// Create a classifier with freshly initialized weights everywhere
    pub fn new(config: &ClassifierConfig, device: &B::Device) -> Self {
        Self {
            backbone: MobileNetV2Features::new(device),
            global_pool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            dropout: DropoutConfig::new(config.dropout_rate).init(),
            fc1: LinearConfig::new(FEATURE_CHANNELS, config.hidden_units).init(device),
            fc2: LinearConfig::new(config.hidden_units, config.num_classes).init(device),
            num_classes: config.num_classes,
        }
    }

    /// Replace the trunk with pretrained weights and freeze it
    pub fn with_backbone(mut self, backbone: MobileNetV2Features<B>) -> Self {
        self.backbone = backbone.no_grad();
        self
    }

    /// Forward pass through the network
    ///
    /// # Arguments
    /// * `x` - Input tensor of shape [batch_size, 3, 224, 224]
    ///
    /// # Returns
    /// * Logits tensor of shape [batch_size, num_classes]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.backbone.forward(x);
        let x = flatten_pooled(self.global_pool.forward(x));

        let x = self.dropout.forward(x);
        let x = self.fc1.forward(x);
        let x = Relu::new().forward(x);
        self.fc2.forward(x)
    }

    /// Forward pass with softmax for inference
    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        burn::tensor::activation::softmax(self.forward(x), 1)
    }

    /// Number of classes the configuration asked for
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Width of the classification layer as stored in its weights.
    ///
    /// Differs from `num_classes` when a record with another head was loaded.
    pub fn output_width(&self) -> usize {
        // Linear weights are [d_input, d_output]
        self.fc2.weight.val().dims()[1]
    }
}

/// Placeholder classifier used when no real model can be built
#[derive(Module, Debug)]
pub struct MinimalClassifier<B: Backend> {
    pub global_pool: AdaptiveAvgPool2d,
    pub fc1: Linear<B>,
    pub fc2: Linear<B>,
    num_classes: usize,
}

impl<B: Backend> MinimalClassifier<B> {
    pub fn new(config: &ClassifierConfig, device: &B::Device) -> Self {
        Self {
            global_pool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            fc1: LinearConfig::new(3, config.minimal_hidden_units).init(device),
            fc2: LinearConfig::new(config.minimal_hidden_units, config.num_classes).init(device),
            num_classes: config.num_classes,
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = flatten_pooled(self.global_pool.forward(x));
        let x = self.fc1.forward(x);
        let x = Relu::new().forward(x);
        self.fc2.forward(x)
    }

    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        burn::tensor::activation::softmax(self.forward(x), 1)
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn output_width(&self) -> usize {
        self.fc2.weight.val().dims()[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_derma_classifier_output_shape() {
        let device = Default::default();
        let config = ClassifierConfig::new();
        let model = DermaClassifier::<TestBackend>::new(&config, &device);

        // The pooled head accepts any spatial size; 64x64 keeps this fast
        let input = Tensor::<TestBackend, 4>::zeros([2, 3, 64, 64], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [2, 24]);
        assert_eq!(model.output_width(), 24);
    }

    #[test]
    fn test_minimal_classifier_softmax_sums_to_one() {
        let device = Default::default();
        let config = ClassifierConfig::new();
        let model = MinimalClassifier::<TestBackend>::new(&config, &device);

        let input = Tensor::<TestBackend, 4>::ones([1, 3, 224, 224], &device);
        let probs: Vec<f32> = model
            .forward_softmax(input)
            .into_data()
            .to_vec()
            .expect("probabilities");

        assert_eq!(probs.len(), 24);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_minimal_classifier_width_follows_config() {
        let device = Default::default();
        let config = ClassifierConfig::new().with_num_classes(10);
        let model = MinimalClassifier::<TestBackend>::new(&config, &device);
        assert_eq!(model.num_classes(), 10);
        assert_eq!(model.output_width(), 10);
    }
}
