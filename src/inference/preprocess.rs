//! Image preprocessing for model inference.
//!
//! Converts arbitrary uploaded images into the fixed (1, 3, 224, 224)
//! normalized NCHW tensor the classifier expects. Uses standard ImageNet
//! statistics; changing either constant requires a matching model.

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

use crate::utils::error::{ClassifierError, Result};
use crate::INPUT_SIZE;

/// ImageNet normalization mean values (RGB)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet normalization std values (RGB)
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decode raw uploaded bytes into an image.
///
/// Decode failure is terminal for the request; the caller decides the
/// fallback (mock prediction).
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| ClassifierError::ImageDecode(e.to_string()))
}

/// Preprocess a decoded image into a model input tensor.
///
/// - Forces RGB (3 channels)
/// - Resizes exactly to `INPUT_SIZE` x `INPUT_SIZE` (aspect ratio is not
///   preserved, matching the training transform)
/// - Scales pixels to [0, 1] and normalizes per channel
/// - Returns CHW layout with a leading batch dimension of 1
pub fn preprocess(image: &DynamicImage) -> Result<Array4<f32>> {
    let resized = image.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3);
    let rgb = resized.to_rgb8();

    let size = INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, 3, size, size));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            let scaled = pixel[c] as f32 / 255.0;
            tensor[[0, c, y as usize, x as usize]] = (scaled - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }

    Ok(tensor)
}
