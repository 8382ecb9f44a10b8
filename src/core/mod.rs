//! Core building blocks of the classification pipeline.
//!
//! This module contains:
//! - Error handling
//! - Tensor type aliases
//! - The ONNX Runtime session wrapper
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod errors;
pub mod inference;

pub use errors::ClassifierError;
pub use inference::{InferenceHandle, OrtInfer};

/// A 2-dimensional tensor represented as a 2D array of f32 values.
pub type Tensor2D = ndarray::Array2<f32>;

/// A 4-dimensional tensor represented as a 4D array of f32 values.
pub type Tensor4D = ndarray::Array4<f32>;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and
/// formatting layer. It's typically called at the start of an application to
/// enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
