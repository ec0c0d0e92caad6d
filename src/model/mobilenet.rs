//! MobileNetV2 feature extractor
//!
//! The convolutional trunk of MobileNetV2 (everything up to, but not
//! including, the ImageNet classification head). It maps a
//! `[batch, 3, 224, 224]` image to `[batch, 1280, 7, 7]` feature maps and is
//! used frozen: its weights come from a pretrained record and are never
//! updated by this crate.

use burn::{
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d,
    },
    tensor::{backend::Backend, Tensor},
};

/// Number of channels produced by the feature extractor
pub const FEATURE_CHANNELS: usize = 1280;

/// Inverted residual settings: (expansion, output channels, repeats, first stride)
const BLOCK_SETTINGS: [(usize, usize, usize, usize); 7] = [
    (1, 16, 1, 1),
    (6, 24, 2, 2),
    (6, 32, 3, 2),
    (6, 64, 4, 2),
    (6, 96, 3, 1),
    (6, 160, 3, 2),
    (6, 320, 1, 1),
];

/// Conv2d + BatchNorm + ReLU6
#[derive(Module, Debug)]
pub struct ConvBnRelu6<B: Backend> {
    pub conv: Conv2d<B>,
    pub bn: BatchNorm<B>,
}

impl<B: Backend> ConvBnRelu6<B> {
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        groups: usize,
        device: &B::Device,
    ) -> Self {
        let padding = (kernel_size - 1) / 2;
        let conv = Conv2dConfig::new([in_channels, out_channels], [kernel_size, kernel_size])
            .with_stride([stride, stride])
            .with_padding(PaddingConfig2d::Explicit(padding, padding))
            .with_groups(groups)
            .with_bias(false)
            .init(device);

        Self {
            conv,
            bn: BatchNormConfig::new(out_channels).init(device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv.forward(x);
        let x = self.bn.forward(x);
        x.clamp(0.0, 6.0)
    }
}

/// MobileNetV2 inverted residual block
#[derive(Module, Debug)]
pub struct InvertedResidual<B: Backend> {
    pub expand: Option<ConvBnRelu6<B>>,
    pub depthwise: ConvBnRelu6<B>,
    pub project: Conv2d<B>,
    pub project_bn: BatchNorm<B>,
    use_residual: bool,
}

impl<B: Backend> InvertedResidual<B> {
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        stride: usize,
        expansion: usize,
        device: &B::Device,
    ) -> Self {
        let hidden = in_channels * expansion;

        let expand = if expansion == 1 {
            None
        } else {
            Some(ConvBnRelu6::new(in_channels, hidden, 1, 1, 1, device))
        };

        // Depthwise: one group per channel
        let depthwise = ConvBnRelu6::new(hidden, hidden, 3, stride, hidden, device);

        // Linear bottleneck, no activation
        let project = Conv2dConfig::new([hidden, out_channels], [1, 1])
            .with_bias(false)
            .init(device);
        let project_bn = BatchNormConfig::new(out_channels).init(device);

        Self {
            expand,
            depthwise,
            project,
            project_bn,
            use_residual: stride == 1 && in_channels == out_channels,
        }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = match &self.expand {
            Some(expand) => expand.forward(input.clone()),
            None => input.clone(),
        };
        let x = self.depthwise.forward(x);
        let x = self.project_bn.forward(self.project.forward(x));

        if self.use_residual {
            x + input
        } else {
            x
        }
    }
}

/// MobileNetV2 convolutional trunk
#[derive(Module, Debug)]
pub struct MobileNetV2Features<B: Backend> {
    pub stem: ConvBnRelu6<B>,
    pub blocks: Vec<InvertedResidual<B>>,
    pub head: ConvBnRelu6<B>,
}

impl<B: Backend> MobileNetV2Features<B> {
    /// Build the trunk with freshly initialized weights
    pub fn new(device: &B::Device) -> Self {
        let stem = ConvBnRelu6::new(3, 32, 3, 2, 1, device);

        let mut blocks = Vec::new();
        let mut in_channels = 32;
        for (expansion, out_channels, repeats, first_stride) in BLOCK_SETTINGS {
            for i in 0..repeats {
                let stride = if i == 0 { first_stride } else { 1 };
                blocks.push(InvertedResidual::new(
                    in_channels,
                    out_channels,
                    stride,
                    expansion,
                    device,
                ));
                in_channels = out_channels;
            }
        }

        let head = ConvBnRelu6::new(in_channels, FEATURE_CHANNELS, 1, 1, 1, device);

        Self { stem, blocks, head }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `x` - Input tensor of shape [batch_size, 3, height, width]
    ///
    /// # Returns
    /// * Feature maps of shape [batch_size, 1280, height / 32, width / 32]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut x = self.stem.forward(x);
        for block in &self.blocks {
            x = block.forward(x);
        }
        self.head.forward(x)
    }
}
