//! # emovision
//!
//! Emotion image classification backed by a remotely-hosted, gzip-compressed
//! ONNX model.
//!
//! The crate covers the full model-acquisition and preprocessing pipeline:
//! progressive chunked download with live progress reporting, gzip inflation
//! of the assembled payload, ONNX session construction from the decompressed
//! bytes, image-to-tensor conversion with per-channel normalization, and
//! softmax/arg-max interpretation of the raw model scores. The forward pass
//! itself is delegated to ONNX Runtime.
//!
//! ## Modules
//!
//! * [`core`] - error handling, tensor aliases, and the session wrapper
//! * [`net`] - chunked download and gzip decompression
//! * [`loader`] - fetch -> decompress -> session orchestration
//! * [`processors`] - tensor preprocessing and score interpretation
//! * [`pipeline`] - the classifier context and configuration
//! * [`utils`] - image loading helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use emovision::prelude::*;
//!
//! # async fn run() -> Result<(), ClassifierError> {
//! let config = ClassifierConfig::new("https://example.com/emotion_model.onnx.gz");
//! let context = ClassifierContext::new(config)?;
//!
//! // Acquire the model once at startup, watching progress.
//! context
//!     .load_with_progress(|phase| {
//!         if let LoadPhase::Fetching(p) = phase {
//!             if let Some(percent) = p.percent() {
//!                 eprintln!("downloading: {percent:.0}%");
//!             }
//!         }
//!     })
//!     .await?;
//!
//! // Classify as many images as desired against the shared handle.
//! let image = emovision::utils::load_image(std::path::Path::new("face.png"))?;
//! let result = context.classify(&image)?;
//! println!("{}: {:.1}%", result.label, result.score * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod loader;
pub mod net;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use emovision::prelude::*;
/// ```
pub mod prelude {
    // Pipeline surface (essential)
    pub use crate::pipeline::{
        Classification, ClassifierConfig, ClassifierContext, EmotionClassifier,
        EmotionClassifierBuilder,
    };

    // Model acquisition
    pub use crate::loader::{LoadPhase, ModelLoader};
    pub use crate::net::DownloadProgress;

    // Error handling (essential)
    pub use crate::core::{ClassifierError, InferenceHandle};
}
