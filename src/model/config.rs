//! Model Configuration Module
//!
//! Hyper-parameters shared by every classifier tier. The defaults describe the
//! reference skin-lesion classifier: 224x224 RGB input, a 1024-unit hidden
//! layer and one output per disease label.

use burn::config::Config;

use crate::knowledge::NUM_CLASSES;
use crate::utils::error::DermaError;

/// Configuration for the classifier architectures
#[derive(Config, Debug)]
pub struct ClassifierConfig {
    /// Number of output classes (must equal the label table length)
    #[config(default = "24")]
    pub num_classes: usize,

    /// Input image size (square)
    #[config(default = "224")]
    pub input_size: usize,

    /// Dropout rate between the pooled features and the hidden layer
    #[config(default = "0.3")]
    pub dropout_rate: f64,

    /// Units in the hidden dense layer of the reference head
    #[config(default = "1024")]
    pub hidden_units: usize,

    /// Units in the hidden dense layer of the minimal placeholder model
    #[config(default = "128")]
    pub minimal_hidden_units: usize,
}

impl ClassifierConfig {
    /// Validate the configuration
    pub fn validate(&self) -> crate::utils::error::Result<()> {
        if self.num_classes == 0 {
            return Err(DermaError::Config(
                "num_classes must be greater than 0".to_string(),
            ));
        }

        if self.num_classes != NUM_CLASSES {
            return Err(DermaError::Config(format!(
                "num_classes ({}) must match the label table ({})",
                self.num_classes, NUM_CLASSES
            )));
        }

        if self.input_size == 0 || self.input_size % 32 != 0 {
            return Err(DermaError::Config(
                "input_size must be a positive multiple of 32".to_string(),
            ));
        }

        if self.dropout_rate < 0.0 || self.dropout_rate >= 1.0 {
            return Err(DermaError::Config(
                "dropout_rate must be in range [0.0, 1.0)".to_string(),
            ));
        }

        if self.hidden_units == 0 || self.minimal_hidden_units == 0 {
            return Err(DermaError::Config(
                "hidden layers must have at least one unit".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_config_default() {
        let config = ClassifierConfig::new();
        assert_eq!(config.num_classes, 24);
        assert_eq!(config.input_size, 224);
        assert_eq!(config.hidden_units, 1024);
        assert_eq!(config.minimal_hidden_units, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_classifier_config_validation() {
        let config = ClassifierConfig::new().with_num_classes(0);
        assert!(config.validate().is_err());

        let config = ClassifierConfig::new().with_num_classes(38);
        assert!(config.validate().is_err());

        let config = ClassifierConfig::new().with_input_size(100);
        assert!(config.validate().is_err());

        let config = ClassifierConfig::new().with_dropout_rate(1.5);
        assert!(matches!(config.validate(), Err(DermaError::Config(_))));
    }
}
