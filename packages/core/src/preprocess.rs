//! Image → model tensor normalization.
//!
//! The classifiers were trained on exactly this transform: convert to RGB, stretch to
//! 224×224 with bicubic resampling, scale to [0, 1] and add a batch axis (NHWC).
use crate::error::PredictError;
use image::imageops::{self, FilterType};
use ndarray::Array4;

/// Spatial input size (width, height) of both classifiers
pub const INPUT_SIZE: (u32, u32) = (224, 224);

/// Model input, shape `[1, height, width, 3]`, values in `[0, 1]`
pub type ImageTensor = Array4<f32>;

pub fn preprocess(bytes: &[u8]) -> Result<ImageTensor, PredictError> {
    let img = image::load_from_memory(bytes)?;

    // Alpha and palette information is dropped, not composited.
    let rgb = img.to_rgb8();

    // Aspect ratio is not preserved (no crop, no letterbox).
    let (width, height) = INPUT_SIZE;
    let resized = imageops::resize(&rgb, width, height, FilterType::CatmullRom);

    let tensor = Array4::from_shape_fn(
        (1, height as usize, width as usize, 3),
        |(_, y, x, c)| {
            let p = resized.get_pixel(x as u32, y as u32);
            p[c] as f32 / 255.0
        },
    );

    Ok(tensor)
}
