//! Model acquisition orchestration.
//!
//! The loader runs the three acquisition stages strictly in sequence: the
//! archive is fetched completely, then decompressed, then handed to session
//! construction. Observers receive [`LoadPhase`] transitions so a consumer
//! can render a progress indicator and a not-ready/ready state.
//!
//! Idempotency policy: the handle is cached after the first successful load,
//! and every later call returns the cached handle without re-running the
//! pipeline. A failed load is not cached. Nothing is retried internally, but
//! an explicit new `load` call after a failure runs the full pipeline again.

use crate::core::errors::ClassifierError;
use crate::core::inference::{InferenceHandle, OrtInfer};
use crate::net::{DownloadProgress, StreamFetcher, decompress_gzip};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Observable stages of the model acquisition pipeline, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadPhase {
    /// The compressed archive is downloading.
    Fetching(DownloadProgress),
    /// The assembled archive is being inflated.
    Decompressing,
    /// The inference session is being constructed from the model bytes.
    BuildingSession,
    /// The inference handle exists; classification may begin.
    Ready,
}

/// Fetches, decompresses, and instantiates the classification model,
/// exposing a single ready-to-use inference handle.
#[derive(Debug)]
pub struct ModelLoader {
    url: String,
    input_name: String,
    output_name: String,
    fetcher: StreamFetcher,
    handle: OnceCell<InferenceHandle>,
}

impl ModelLoader {
    /// Creates a loader for the archive at `url` with the given graph tensor
    /// names.
    pub fn new(
        url: impl Into<String>,
        input_name: impl Into<String>,
        output_name: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            input_name: input_name.into(),
            output_name: output_name.into(),
            fetcher: StreamFetcher::new(),
            handle: OnceCell::new(),
        }
    }

    /// Whether a successful load has produced an inference handle.
    pub fn is_ready(&self) -> bool {
        self.handle.initialized()
    }

    /// Returns the cached handle, if a load has completed.
    pub fn handle(&self) -> Option<InferenceHandle> {
        self.handle.get().cloned()
    }

    /// Runs the acquisition pipeline without progress reporting.
    pub async fn load(&self) -> Result<InferenceHandle, ClassifierError> {
        self.load_with_progress(|_| {}).await
    }

    /// Runs the acquisition pipeline, reporting [`LoadPhase`] transitions to
    /// `observer`.
    ///
    /// Concurrent callers are coalesced onto one pipeline run; callers that
    /// did not win the race (and callers arriving after completion) observe
    /// only the terminal `Ready` transition.
    pub async fn load_with_progress(
        &self,
        mut observer: impl FnMut(LoadPhase),
    ) -> Result<InferenceHandle, ClassifierError> {
        let handle = self
            .handle
            .get_or_try_init(|| self.run_pipeline(&mut observer))
            .await?
            .clone();
        observer(LoadPhase::Ready);
        Ok(handle)
    }

    async fn run_pipeline(
        &self,
        observer: &mut impl FnMut(LoadPhase),
    ) -> Result<InferenceHandle, ClassifierError> {
        info!(url = %self.url, "loading model");

        let compressed = self
            .fetcher
            .fetch(&self.url, |p| observer(LoadPhase::Fetching(p)))
            .await
            .map_err(|e| ClassifierError::model_load_error("failed to fetch model archive", e))?;

        observer(LoadPhase::Decompressing);
        let model_bytes = decompress_gzip(&compressed).map_err(|e| {
            ClassifierError::model_load_error("failed to decompress model archive", e)
        })?;
        info!(
            compressed_bytes = compressed.len(),
            model_bytes = model_bytes.len(),
            "model archive decompressed"
        );

        observer(LoadPhase::BuildingSession);
        let inference = OrtInfer::from_memory(&model_bytes, &self.input_name, &self.output_name)
            .map_err(|e| match e {
                err @ ClassifierError::ModelLoad { .. } => err,
                other => {
                    ClassifierError::model_load_error("failed to construct inference session", other)
                }
            })?;
        info!("inference session ready");

        Ok(Arc::new(inference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_ready() {
        let loader = ModelLoader::new("http://127.0.0.1:1/model.onnx.gz", "input", "output");
        assert!(!loader.is_ready());
        assert!(loader.handle().is_none());
    }

    #[tokio::test]
    async fn failed_load_is_not_cached_and_stays_not_ready() {
        // Port 1 refuses connections; the fetch stage fails immediately.
        let loader = ModelLoader::new("http://127.0.0.1:1/model.onnx.gz", "input", "output");

        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, ClassifierError::ModelLoad { .. }));
        assert!(!loader.is_ready());

        // A second explicit call re-runs the pipeline and fails again rather
        // than observing a poisoned cache.
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, ClassifierError::ModelLoad { .. }));
        assert!(!loader.is_ready());
    }
}
