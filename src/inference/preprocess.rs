//! Image Preprocessor
//!
//! Turns an image file into the `[1, 224, 224, 3]` float tensor the classifier
//! expects: decode, force RGB, resize to exactly 224x224 (aspect ratio is not
//! preserved) and scale pixel values from `[0, 255]` to `[0, 1]`.

use std::path::Path;

use image::{imageops::FilterType, DynamicImage, ImageReader};

use crate::utils::error::{DermaError, Result};

/// Side length of the square model input
pub const INPUT_SIZE: usize = 224;

/// Number of color channels of the model input
pub const INPUT_CHANNELS: usize = 3;

/// A preprocessed image in NHWC layout with a batch of one
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
    shape: [usize; 4],
}

impl ImageTensor {
    /// Wrap raw NHWC values; `data.len()` must equal the product of `shape`
    pub fn from_raw(data: Vec<f32>, shape: [usize; 4]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(DermaError::InvalidInput(format!(
                "tensor data has {} values but shape {:?} needs {}",
                data.len(),
                shape,
                expected
            )));
        }
        Ok(Self { data, shape })
    }

    /// `[batch, height, width, channels]`
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Load and preprocess an image from a file path
pub fn preprocess(path: &Path) -> Result<ImageTensor> {
    // Checked up front so a missing upload is reported as such, not as a decode error
    if !path.exists() {
        return Err(DermaError::ImageNotFound(path.to_path_buf()));
    }

    let decode_error = |message: String| DermaError::ImageDecode {
        path: path.to_path_buf(),
        message,
    };

    let image = ImageReader::open(path)
        .map_err(|e| decode_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?
        .decode()
        .map_err(|e| decode_error(e.to_string()))?;

    Ok(preprocess_image(&image))
}

/// Preprocess an already decoded image
pub fn preprocess_image(image: &DynamicImage) -> ImageTensor {
    let size = INPUT_SIZE as u32;
    // Nearest keeps parity with how the trained model saw its inputs
    let rgb = image.resize_exact(size, size, FilterType::Nearest).to_rgb8();

    let data: Vec<f32> = rgb
        .pixels()
        .flat_map(|pixel| pixel.0)
        .map(|value| value as f32 / 255.0)
        .collect();

    ImageTensor {
        data,
        shape: [1, INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS],
    }
}
