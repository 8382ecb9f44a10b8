//! Error types for the classification pipeline.
//!
//! One enum covers the whole failure taxonomy: model acquisition (fetch,
//! decompression, session construction), per-request preprocessing, and score
//! interpretation. Acquisition failures are fatal to every classification
//! attempt until a successful load exists; preprocessing and interpretation
//! failures are local to a single attempt.

use thiserror::Error;

/// Errors that can occur in the classification pipeline.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Network or status failure while downloading the model archive.
    #[error("fetch failed: {context}")]
    Fetch {
        /// Additional context about the failure.
        context: String,
        /// The underlying error, if any (a non-success status has none).
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed or truncated compressed stream.
    #[error("decompression failed: {context}")]
    Decompression {
        /// Additional context about the failure.
        context: String,
        /// The underlying decoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failure anywhere in the fetch -> decompress -> session pipeline.
    ///
    /// Also raised when classification is requested before the model is
    /// ready.
    #[error("model load failed: {context}")]
    ModelLoad {
        /// Additional context about the failure.
        context: String,
        /// The wrapped stage error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid image input for tensor conversion.
    #[error("preprocess failed: {context}")]
    Preprocess {
        /// Additional context about the failure.
        context: String,
    },

    /// Error indicating invalid input to score interpretation.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error occurred while decoding an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    /// Creates a fetch error wrapping an underlying transport failure.
    pub fn fetch_error(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Fetch {
            context: context.into(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates a fetch error with no underlying source, e.g. a non-success
    /// HTTP status or a declared-length mismatch.
    pub fn fetch_failed(context: impl Into<String>) -> Self {
        Self::Fetch {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a decompression error.
    pub fn decompression_error(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decompression {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a model load error wrapping a pipeline stage failure.
    pub fn model_load_error(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelLoad {
            context: context.into(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates a model load error with no underlying source, e.g. a missing
    /// graph tensor or a not-ready rejection.
    pub fn model_load_failed(context: impl Into<String>) -> Self {
        Self::ModelLoad {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a preprocess error.
    pub fn preprocess_error(context: impl Into<String>) -> Self {
        Self::Preprocess {
            context: context.into(),
        }
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for configuration problems.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for ClassifierError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}
