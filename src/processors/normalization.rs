//! Image normalization into a planar channel-first tensor.
//!
//! This module converts a raster image into the fixed-shape numeric tensor
//! the classification model consumes: resized to the target dimensions, each
//! color channel normalized with per-channel mean and standard deviation, and
//! laid out planar (all red values first, then green, then blue).

use crate::core::errors::ClassifierError;
use crate::core::Tensor4D;
use image::{DynamicImage, imageops::FilterType};

/// Normalizes images into model input tensors.
///
/// This struct encapsulates the parameters needed to normalize images:
/// per-channel mean and standard deviation, and the resampling filter used
/// when resizing to the model's input shape.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Mean values for each RGB channel.
    mean: [f32; 3],
    /// Standard deviation values for each RGB channel.
    std: [f32; 3],
    /// Resampling filter applied when resizing. Triangle (bilinear) is
    /// deterministic for identical inputs.
    filter: FilterType,
}

impl NormalizeImage {
    /// Creates a new NormalizeImage instance with the specified parameters.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any standard deviation value is not
    /// greater than 0 or any parameter is not finite.
    pub fn new(mean: [f32; 3], std: [f32; 3], filter: FilterType) -> Result<Self, ClassifierError> {
        for (i, &s) in std.iter().enumerate() {
            if !(s > 0.0) {
                return Err(ClassifierError::config_error(format!(
                    "standard deviation at index {i} must be greater than 0, got {s}"
                )));
            }
        }
        for (i, &m) in mean.iter().enumerate() {
            if !m.is_finite() {
                return Err(ClassifierError::config_error(format!(
                    "mean at index {i} is not finite: {m}"
                )));
            }
        }

        Ok(Self { mean, std, filter })
    }

    /// Creates a normalizer with the standard ImageNet statistics and
    /// bilinear resampling.
    pub fn imagenet() -> Self {
        Self {
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
            filter: FilterType::Triangle,
        }
    }

    /// Converts an image into a normalized planar tensor of shape
    /// (1, 3, target_height, target_width).
    ///
    /// The source is resized to exactly the target dimensions, read in
    /// row-major RGBA order, and each color channel value is normalized as
    /// `(byte / 255.0 - mean[c]) / std[c]`. The alpha channel is discarded.
    /// The conversion is pure: identical image and dimensions always yield
    /// bit-identical output.
    ///
    /// # Errors
    ///
    /// Returns a preprocess error if the source image or the target shape has
    /// zero width or height.
    pub fn to_tensor(
        &self,
        img: &DynamicImage,
        target_width: u32,
        target_height: u32,
    ) -> Result<Tensor4D, ClassifierError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(ClassifierError::preprocess_error(format!(
                "source image has zero dimensions ({}x{})",
                img.width(),
                img.height()
            )));
        }
        if target_width == 0 || target_height == 0 {
            return Err(ClassifierError::preprocess_error(format!(
                "target shape has zero dimensions ({target_width}x{target_height})"
            )));
        }

        let resized = image::imageops::resize(
            &img.to_rgba8(),
            target_width,
            target_height,
            self.filter,
        );

        let width = target_width as usize;
        let height = target_height as usize;
        let plane = width * height;
        let mut data = vec![0.0f32; 3 * plane];

        for (i, pixel) in resized.pixels().enumerate() {
            for c in 0..3 {
                data[c * plane + i] = (pixel[c] as f32 / 255.0 - self.mean[c]) / self.std[c];
            }
        }

        Tensor4D::from_shape_vec((1, 3, height, width), data).map_err(ClassifierError::from)
    }
}

impl Default for NormalizeImage {
    fn default() -> Self {
        Self::imagenet()
    }
}
