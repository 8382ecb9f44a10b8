//! High-level classification pipeline.
//!
//! [`ClassifierContext`] is the owned context object constructed once at
//! startup: it runs model acquisition, holds the shared inference handle, and
//! exposes read-only classification to its consumers. There is no hidden
//! module state; everything the pipeline needs lives in this context.
//!
//! [`EmotionClassifier`] is the per-request path: image in, normalized
//! tensor through the session, interpreted scores out.

use crate::core::errors::ClassifierError;
use crate::core::inference::InferenceHandle;
use crate::loader::{LoadPhase, ModelLoader};
use crate::processors::{NormalizeImage, interpret};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// The fixed class labels, in the model's output order.
pub const DEFAULT_LABELS: [&str; 3] = ["negative", "neutral", "positive"];

/// Default graph input tensor name.
pub const DEFAULT_INPUT_NAME: &str = "input";

/// Default graph output tensor name.
pub const DEFAULT_OUTPUT_NAME: &str = "output";

/// Configuration for the classification pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// URL of the gzip-compressed ONNX model archive.
    pub model_url: String,
    /// Model input width in pixels.
    pub input_width: u32,
    /// Model input height in pixels.
    pub input_height: u32,
    /// Graph input tensor name.
    pub input_name: String,
    /// Graph output tensor name.
    pub output_name: String,
    /// Class labels, in the model's output order.
    pub labels: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_url: String::new(),
            input_width: 224,
            input_height: 224,
            input_name: DEFAULT_INPUT_NAME.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ClassifierConfig {
    /// Creates a configuration for the archive at `url` with default input
    /// shape, tensor names, and labels.
    pub fn new(model_url: impl Into<String>) -> Self {
        Self {
            model_url: model_url.into(),
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        serde_json::from_str(json)
            .map_err(|e| ClassifierError::config_error(format!("invalid configuration: {e}")))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.model_url.is_empty() {
            return Err(ClassifierError::config_error("model URL must not be empty"));
        }
        if self.input_width == 0 || self.input_height == 0 {
            return Err(ClassifierError::config_error(format!(
                "input shape must be non-zero, got {}x{}",
                self.input_width, self.input_height
            )));
        }
        if self.labels.is_empty() {
            return Err(ClassifierError::config_error("label set must not be empty"));
        }
        if self.input_name.is_empty() || self.output_name.is_empty() {
            return Err(ClassifierError::config_error(
                "graph tensor names must not be empty",
            ));
        }
        Ok(())
    }
}

/// Result of classifying one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// The winning class label.
    pub label: String,
    /// Index of the winning class.
    pub predicted_index: usize,
    /// Probability of the winning class.
    pub score: f32,
    /// Per-class probabilities, in label order.
    pub probabilities: Vec<f32>,
}

/// Classifies images with a ready inference handle.
#[derive(Debug)]
pub struct EmotionClassifier {
    inference: InferenceHandle,
    normalizer: NormalizeImage,
    labels: Vec<String>,
    input_width: u32,
    input_height: u32,
}

impl EmotionClassifier {
    /// Classifies one image: resize + normalize into a planar tensor, run
    /// the forward pass, interpret the logits.
    ///
    /// Failures here are local to this attempt; the shared handle is left
    /// untouched and the caller may retry with another image.
    pub fn classify(&self, image: &DynamicImage) -> Result<Classification, ClassifierError> {
        let tensor = self
            .normalizer
            .to_tensor(image, self.input_width, self.input_height)?;
        let logits = self.inference.infer(&tensor)?;

        if logits.nrows() == 0 {
            return Err(ClassifierError::invalid_input(
                "model produced an empty logits batch",
            ));
        }
        let row = logits.row(0).to_vec();
        let scores = interpret(&row)?;

        let label = self
            .labels
            .get(scores.predicted_index)
            .cloned()
            .unwrap_or_else(|| format!("class_{}", scores.predicted_index));
        let score = scores.probabilities[scores.predicted_index];
        debug!(label = %label, score = score, "classified image");

        Ok(Classification {
            label,
            predicted_index: scores.predicted_index,
            score,
            probabilities: scores.probabilities,
        })
    }

    /// Returns the class labels in output order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Builder for [`EmotionClassifier`].
#[derive(Debug, Default)]
pub struct EmotionClassifierBuilder {
    config: ClassifierConfig,
}

impl EmotionClassifierBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the full configuration.
    pub fn config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the class labels.
    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.config.labels = labels;
        self
    }

    /// Sets the model input shape as (width, height).
    pub fn input_shape(mut self, width: u32, height: u32) -> Self {
        self.config.input_width = width;
        self.config.input_height = height;
        self
    }

    /// Builds the classifier around a ready inference handle.
    pub fn build(self, inference: InferenceHandle) -> Result<EmotionClassifier, ClassifierError> {
        if self.config.input_width == 0 || self.config.input_height == 0 {
            return Err(ClassifierError::config_error(format!(
                "input shape must be non-zero, got {}x{}",
                self.config.input_width, self.config.input_height
            )));
        }
        if self.config.labels.is_empty() {
            return Err(ClassifierError::config_error("label set must not be empty"));
        }

        Ok(EmotionClassifier {
            inference,
            normalizer: NormalizeImage::imagenet(),
            labels: self.config.labels,
            input_width: self.config.input_width,
            input_height: self.config.input_height,
        })
    }
}

/// Owned startup context: model acquisition plus the classification surface.
///
/// Constructed once; `load` must complete before `classify` will accept
/// requests. A classification request before the model is ready is rejected
/// (not queued) with a model-load error, and does not poison the context.
#[derive(Debug)]
pub struct ClassifierContext {
    config: ClassifierConfig,
    loader: ModelLoader,
    classifier: OnceLock<EmotionClassifier>,
}

impl ClassifierContext {
    /// Creates a context from a validated configuration.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        let loader = ModelLoader::new(
            config.model_url.clone(),
            config.input_name.clone(),
            config.output_name.clone(),
        );
        Ok(Self {
            config,
            loader,
            classifier: OnceLock::new(),
        })
    }

    /// Runs model acquisition without progress reporting.
    pub async fn load(&self) -> Result<(), ClassifierError> {
        self.load_with_progress(|_| {}).await
    }

    /// Runs model acquisition, forwarding [`LoadPhase`] transitions to
    /// `observer`. Subsequent calls return the cached handle (see
    /// [`ModelLoader`] for the idempotency policy).
    pub async fn load_with_progress(
        &self,
        observer: impl FnMut(LoadPhase),
    ) -> Result<(), ClassifierError> {
        let handle = self.loader.load_with_progress(observer).await?;
        if self.classifier.get().is_none() {
            let classifier = EmotionClassifierBuilder::new()
                .config(self.config.clone())
                .build(handle)?;
            let _ = self.classifier.set(classifier);
        }
        Ok(())
    }

    /// Whether the model is loaded and classification requests are accepted.
    pub fn is_ready(&self) -> bool {
        self.classifier.get().is_some()
    }

    /// Classifies one image, rejecting the request if the model is not ready.
    pub fn classify(&self, image: &DynamicImage) -> Result<Classification, ClassifierError> {
        let classifier = self.classifier.get().ok_or_else(|| {
            ClassifierError::model_load_failed(
                "model not ready; classification is rejected until load completes",
            )
        })?;
        classifier.classify(image)
    }

    /// Returns the class labels in output order.
    pub fn labels(&self) -> &[String] {
        &self.config.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn default_config_carries_fixed_contract() {
        let config = ClassifierConfig::default();
        assert_eq!(config.input_name, "input");
        assert_eq!(config.output_name, "output");
        assert_eq!(config.labels, vec!["negative", "neutral", "positive"]);
        assert_eq!((config.input_width, config.input_height), (224, 224));
    }

    #[test]
    fn config_rejects_empty_url_and_zero_shape() {
        assert!(ClassifierConfig::default().validate().is_err());

        let mut config = ClassifierConfig::new("http://localhost/model.onnx.gz");
        assert!(config.validate().is_ok());

        config.input_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ClassifierConfig::new("http://localhost/model.onnx.gz");
        let json = serde_json::to_string(&config).unwrap();
        let parsed = ClassifierConfig::from_json(&json).unwrap();
        assert_eq!(parsed.model_url, config.model_url);
        assert_eq!(parsed.labels, config.labels);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let parsed =
            ClassifierConfig::from_json(r#"{"model_url": "http://localhost/m.gz"}"#).unwrap();
        assert_eq!(parsed.input_width, 224);
        assert_eq!(parsed.labels.len(), 3);
    }

    #[test]
    fn winning_logit_maps_to_the_fixed_label_ordering() {
        let scores = interpret(&[2.0, 0.5, -1.0]).unwrap();
        assert_eq!(DEFAULT_LABELS[scores.predicted_index], "negative");

        let scores = interpret(&[-1.0, 0.5, 2.0]).unwrap();
        assert_eq!(DEFAULT_LABELS[scores.predicted_index], "positive");
    }

    #[test]
    fn classify_before_load_is_rejected_not_queued() {
        let context =
            ClassifierContext::new(ClassifierConfig::new("http://127.0.0.1:1/model.onnx.gz"))
                .unwrap();
        assert!(!context.is_ready());

        let image = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
        let err = context.classify(&image).unwrap_err();
        assert!(matches!(err, ClassifierError::ModelLoad { .. }));

        // The rejection must not corrupt the context.
        assert!(!context.is_ready());
        let err = context.classify(&image).unwrap_err();
        assert!(matches!(err, ClassifierError::ModelLoad { .. }));
    }
}
