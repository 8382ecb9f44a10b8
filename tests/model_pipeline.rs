//! End-to-end behavior of the model acquisition pipeline against a local
//! HTTP fixture server.

use std::io::Write as _;
use std::time::Duration;

use flate2::{Compression, write::GzEncoder};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use emovision::core::ClassifierError;
use emovision::net::{StreamFetcher, decompress_gzip};

/// Serves exactly one response on an ephemeral port, writing the body in the
/// given chunk sizes, and returns the resource URL.
async fn spawn_fixture_server(
    status_line: &'static str,
    content_length: Option<usize>,
    body: Vec<u8>,
    chunk_sizes: Vec<usize>,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Drain the request head; the fetcher only issues small GETs.
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;

        let mut head = format!("{status_line}\r\n");
        if let Some(len) = content_length {
            head.push_str(&format!("content-length: {len}\r\n"));
        }
        head.push_str("connection: close\r\n\r\n");
        socket.write_all(head.as_bytes()).await.unwrap();

        let mut offset = 0;
        for size in chunk_sizes {
            let end = (offset + size).min(body.len());
            socket.write_all(&body[offset..end]).await.unwrap();
            socket.flush().await.unwrap();
            offset = end;
            // Give the client a chance to observe distinct chunks.
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        if offset < body.len() {
            socket.write_all(&body[offset..]).await.unwrap();
        }
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}/model.onnx.gz")
}

fn gzip(payload: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn fetch_assembles_chunks_and_reports_progress() {
    let body: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
    let url = spawn_fixture_server(
        "HTTP/1.1 200 OK",
        Some(body.len()),
        body.clone(),
        vec![300, 300, 400],
    )
    .await;

    let mut seen = Vec::new();
    let fetched = StreamFetcher::new()
        .fetch(&url, |p| seen.push(p))
        .await
        .unwrap();

    assert_eq!(fetched, body);
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0].received <= w[1].received));
    assert!(seen.iter().all(|p| p.total == Some(1000)));

    let last = seen.last().unwrap();
    assert_eq!(last.received, 1000);
    assert_eq!(last.percent(), Some(100.0));
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let url = spawn_fixture_server("HTTP/1.1 404 Not Found", Some(0), Vec::new(), vec![]).await;

    let err = StreamFetcher::new().fetch(&url, |_| {}).await.unwrap_err();
    assert!(matches!(err, ClassifierError::Fetch { .. }));
}

#[tokio::test]
async fn missing_content_length_gives_indeterminate_progress() {
    let body = vec![7u8; 512];
    let url = spawn_fixture_server("HTTP/1.1 200 OK", None, body.clone(), vec![256, 256]).await;

    let mut seen = Vec::new();
    let fetched = StreamFetcher::new()
        .fetch(&url, |p| seen.push(p))
        .await
        .unwrap();

    assert_eq!(fetched, body);
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|p| p.total.is_none()));
    assert!(seen.iter().all(|p| p.percent().is_none()));
}

#[tokio::test]
async fn fetch_then_decompress_reproduces_the_original_bytes() {
    let plaintext: Vec<u8> = (0..32_768u32).map(|i| (i * 31 % 256) as u8).collect();
    let compressed = gzip(&plaintext);
    let url = spawn_fixture_server(
        "HTTP/1.1 200 OK",
        Some(compressed.len()),
        compressed.clone(),
        vec![compressed.len() / 3, compressed.len() / 3, compressed.len()],
    )
    .await;

    let fetched = StreamFetcher::new().fetch(&url, |_| {}).await.unwrap();
    assert_eq!(fetched, compressed);

    let inflated = decompress_gzip(&fetched).unwrap();
    assert_eq!(inflated, plaintext);
}

#[tokio::test]
async fn corrupted_archive_fails_decompression_not_fetch() {
    let mut corrupted = gzip(b"model bytes");
    corrupted[0] = 0x00;
    let url = spawn_fixture_server(
        "HTTP/1.1 200 OK",
        Some(corrupted.len()),
        corrupted.clone(),
        vec![corrupted.len()],
    )
    .await;

    let fetched = StreamFetcher::new().fetch(&url, |_| {}).await.unwrap();
    let err = decompress_gzip(&fetched).unwrap_err();
    assert!(matches!(err, ClassifierError::Decompression { .. }));
}
