//! Utility functions for images.

mod image;

pub use image::{decode_image, load_image};
