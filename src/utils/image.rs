//! Image loading helpers.

use crate::core::errors::ClassifierError;
use image::DynamicImage;
use std::path::Path;

/// Loads an image from a file path.
///
/// Handles any format supported by the image crate; decoding failures map to
/// an image-load error.
pub fn load_image(path: &Path) -> Result<DynamicImage, ClassifierError> {
    image::open(path).map_err(ClassifierError::ImageLoad)
}

/// Decodes an image from an in-memory byte buffer, e.g. one produced by a
/// file-selection surface.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ClassifierError> {
    image::load_from_memory(bytes).map_err(ClassifierError::ImageLoad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undecodable_bytes_are_an_image_load_error() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ClassifierError::ImageLoad(_)));
    }
}
