//! ONNX Runtime session wrapper for the classification model.
//!
//! The session is constructed once from the decompressed model bytes and then
//! shared read-only for the lifetime of the process. Tensor names are a fixed
//! wire contract ("input"/"output" by default) and are validated against the
//! model's declared graph interface at construction rather than discovered at
//! run time.

use crate::core::errors::ClassifierError;
use crate::core::{Tensor2D, Tensor4D};
use ort::logging::LogLevel;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::TensorRef;
use std::sync::{Arc, Mutex};

/// Shared, read-only handle to a constructed inference session.
///
/// Created exactly once per process in normal operation and shared by all
/// subsequent classification calls; never torn down.
pub type InferenceHandle = Arc<OrtInfer>;

/// ONNX Runtime inference engine over an in-memory model.
pub struct OrtInfer {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish()
    }
}

impl OrtInfer {
    /// Creates a session from decompressed model bytes.
    ///
    /// Fails with a model load error if the session cannot be constructed or
    /// if the model's graph does not declare the expected input and output
    /// tensor names.
    pub fn from_memory(
        model_bytes: &[u8],
        input_name: &str,
        output_name: &str,
    ) -> Result<Self, ClassifierError> {
        let session = Session::builder()?
            .with_log_level(LogLevel::Error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_memory(model_bytes)
            .map_err(|e| {
                ClassifierError::model_load_error(
                    "failed to create ONNX session from model bytes",
                    e,
                )
            })?;

        if !session.inputs.iter().any(|i| i.name == input_name) {
            return Err(ClassifierError::model_load_failed(format!(
                "model does not declare input tensor '{input_name}'"
            )));
        }
        if !session.outputs.iter().any(|o| o.name == output_name) {
            return Err(ClassifierError::model_load_failed(format!(
                "model does not declare output tensor '{output_name}'"
            )));
        }

        Ok(OrtInfer {
            session: Mutex::new(session),
            input_name: input_name.to_string(),
            output_name: output_name.to_string(),
        })
    }

    /// Returns the input tensor name used for inference.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Returns the output tensor name used for inference.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Runs the forward pass on a (1, 3, H, W) tensor and extracts the raw
    /// per-class logits as a (batch, classes) tensor.
    pub fn infer(&self, x: &Tensor4D) -> Result<Tensor2D, ClassifierError> {
        let input_tensor = TensorRef::from_array_view(x.view())?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session = self.session.lock().map_err(|_| {
            ClassifierError::invalid_input("failed to acquire inference session lock")
        })?;
        let outputs = session.run(inputs)?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()?;

        if output_shape.len() != 2 {
            return Err(ClassifierError::invalid_input(format!(
                "expected 2-dimensional logits from '{}', got shape {:?}",
                self.output_name, output_shape
            )));
        }

        Tensor2D::from_shape_vec(
            (output_shape[0] as usize, output_shape[1] as usize),
            output_data.to_vec(),
        )
        .map_err(ClassifierError::from)
    }
}
