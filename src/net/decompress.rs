//! Gzip inflation of the fully-assembled model payload.
//!
//! Decompression is deliberately whole-buffer: the fetcher accumulates the
//! complete compressed payload before inflating, so no streaming inflate is
//! needed here.

use crate::core::errors::ClassifierError;
use flate2::read::GzDecoder;
use std::io::Read;

/// Inflates a complete gzip-compressed byte buffer.
///
/// The gzip container's own integrity checks apply: malformed magic bytes,
/// truncated members, and trailing CRC/length mismatches all surface as
/// decompression errors.
pub fn decompress_gzip(compressed: &[u8]) -> Result<Vec<u8>, ClassifierError> {
    let mut decoder = GzDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed).map_err(|e| {
        ClassifierError::decompression_error("malformed or truncated gzip stream", e)
    })?;
    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Precomputed gzip payload (mtime zeroed) with a known plaintext.
    const GZIP_FIXTURE: &[u8] = &[
        0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0xff, 0x0d, 0xc9, 0xc1, 0x11, 0x80,
        0x20, 0x0c, 0x04, 0xc0, 0x56, 0xae, 0x00, 0x2b, 0xb0, 0x1b, 0x1c, 0x0e, 0x8d, 0x42, 0x32,
        0x43, 0x82, 0x68, 0xf7, 0xba, 0xdf, 0x65, 0xb3, 0x5b, 0x5c, 0x4c, 0x51, 0xe4, 0x89, 0xd1,
        0xb9, 0x42, 0x2d, 0x90, 0xd0, 0x99, 0x2a, 0x9a, 0x65, 0xd6, 0x05, 0xe7, 0xf0, 0xc0, 0xf6,
        0x06, 0x1d, 0x53, 0xe2, 0xf8, 0xf7, 0x52, 0x9b, 0x8a, 0x2c, 0x3b, 0x3d, 0x3e, 0x5e, 0x6f,
        0x9a, 0xfd, 0x43, 0x00, 0x00, 0x00,
    ];

    const GZIP_FIXTURE_PLAINTEXT: &[u8] =
        b"emovision fixture: not a real model, just bytes with a known digest";

    #[test]
    fn decompresses_precomputed_fixture() {
        let plain = decompress_gzip(GZIP_FIXTURE).unwrap();
        assert_eq!(plain, GZIP_FIXTURE_PLAINTEXT);
    }

    #[test]
    fn rejects_bad_magic_bytes() {
        let mut corrupted = GZIP_FIXTURE.to_vec();
        corrupted[0] = 0x00;
        let err = decompress_gzip(&corrupted).unwrap_err();
        assert!(matches!(err, ClassifierError::Decompression { .. }));
    }

    #[test]
    fn rejects_truncated_stream() {
        let truncated = &GZIP_FIXTURE[..GZIP_FIXTURE.len() / 2];
        let err = decompress_gzip(truncated).unwrap_err();
        assert!(matches!(err, ClassifierError::Decompression { .. }));
    }

    #[test]
    fn rejects_corrupted_crc_trailer() {
        let mut corrupted = GZIP_FIXTURE.to_vec();
        let crc_start = corrupted.len() - 8;
        corrupted[crc_start] ^= 0xff;
        let err = decompress_gzip(&corrupted).unwrap_err();
        assert!(matches!(err, ClassifierError::Decompression { .. }));
    }

    #[test]
    fn round_trips_with_encoder() {
        use flate2::{Compression, write::GzEncoder};
        use std::io::Write;

        let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(decompress_gzip(&compressed).unwrap(), payload);
    }
}
