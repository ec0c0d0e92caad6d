//! Backend abstraction - inference-only backend selection
//!
//! Supports both CUDA (GPU) and NdArray (CPU) backends, chosen at compile time.
//! The service never trains, so there is no autodiff wrapper here.

// --------------------------------------------------------------------------------
// BACKEND SELECTION: CUDA (opt-in) or NdArray (default)
// --------------------------------------------------------------------------------

#[cfg(feature = "cuda")]
pub type InferenceBackend = burn_cuda::Cuda;

#[cfg(all(not(feature = "cuda"), feature = "ndarray"))]
pub type InferenceBackend = burn_ndarray::NdArray;

#[cfg(all(not(feature = "cuda"), not(feature = "ndarray")))]
compile_error!("At least one backend (cuda or ndarray) must be enabled!");

/// Device type of the selected backend
pub type InferenceDevice = <InferenceBackend as burn::tensor::backend::Backend>::Device;

/// Get the default device
pub fn default_device() -> InferenceDevice {
    InferenceDevice::default()
}

/// Get a human-readable name for the current backend
pub fn backend_name() -> &'static str {
    #[cfg(feature = "cuda")]
    {
        "CUDA (GPU)"
    }

    #[cfg(all(not(feature = "cuda"), feature = "ndarray"))]
    {
        "NdArray (CPU)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_available() {
        let _device = default_device();
        assert!(!backend_name().is_empty());
    }
}
