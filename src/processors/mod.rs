//! Image processing for the classification pipeline.
//!
//! * `normalization` - image resizing and channel normalization into a
//!   planar CHW tensor
//! * `postprocess` - softmax and arg-max over raw model logits

mod normalization;
mod postprocess;

pub use normalization::NormalizeImage;
pub use postprocess::{Scores, interpret};
