//! Progressive chunked download of the model archive.
//!
//! The fetcher streams the response body chunk by chunk, invoking a progress
//! callback per chunk, and returns the complete byte buffer only after the
//! source signals end-of-stream. Percentage reporting is best-effort: when the
//! source does not advertise a `content-length`, the total is `None` and
//! progress is indeterminate.

use crate::core::errors::ClassifierError;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::{debug, info};

/// A snapshot of download progress, delivered once per received chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Bytes received so far.
    pub received: u64,
    /// Declared total byte length, if the source advertised one.
    pub total: Option<u64>,
}

impl DownloadProgress {
    /// Completion percentage in [0, 100], or `None` when the total length is
    /// unknown.
    pub fn percent(&self) -> Option<f32> {
        match self.total {
            Some(total) if total > 0 => Some((self.received as f32 / total as f32) * 100.0),
            _ => None,
        }
    }
}

/// Retrieves a remote compressed resource over HTTP with incremental
/// progress callbacks.
#[derive(Debug, Clone, Default)]
pub struct StreamFetcher {
    client: reqwest::Client,
}

impl StreamFetcher {
    /// Creates a fetcher with a default client.
    ///
    /// No overall request timeout is configured; once issued, a fetch runs to
    /// completion or failure.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Downloads the resource at `url`, invoking `on_progress` for each
    /// received chunk, and returns the fully-assembled byte buffer.
    ///
    /// Fails with a fetch error if the request does not succeed (non-success
    /// status), the stream terminates abnormally, or the body length
    /// disagrees with a declared `content-length`.
    pub async fn fetch(
        &self,
        url: &str,
        on_progress: impl FnMut(DownloadProgress),
    ) -> Result<Vec<u8>, ClassifierError> {
        info!(url = %url, "fetching resource");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClassifierError::fetch_error("request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::fetch_failed(format!(
                "unexpected status {status} for {url}"
            )));
        }

        let total = response.content_length();
        debug!(total = ?total, "response stream opened");

        let body = collect_with_progress(response.bytes_stream(), total, on_progress).await?;
        info!(bytes = body.len(), "fetch complete");
        Ok(body)
    }
}

/// Drains a stream of byte chunks into one buffer, reporting progress per
/// chunk and verifying the assembled length against a known total.
///
/// Chunk concatenation preserves byte order; the returned buffer's length
/// equals the sum of the chunk lengths.
pub(crate) async fn collect_with_progress<S, E>(
    mut stream: S,
    total: Option<u64>,
    mut on_progress: impl FnMut(DownloadProgress),
) -> Result<Vec<u8>, ClassifierError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut buffer = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut received: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| ClassifierError::fetch_error("stream terminated abnormally", e))?;
        received += chunk.len() as u64;

        if let Some(total) = total {
            if received > total {
                return Err(ClassifierError::fetch_failed(format!(
                    "received {received} bytes, exceeding declared length {total}"
                )));
            }
        }

        buffer.extend_from_slice(&chunk);
        on_progress(DownloadProgress { received, total });
    }

    if let Some(total) = total {
        if received != total {
            return Err(ClassifierError::fetch_failed(format!(
                "stream ended after {received} of {total} declared bytes"
            )));
        }
    }

    Ok(buffer)
}
