use std::path::Path;

use flowmap_image::{Image, ImageSize};

use crate::error::IoError;

/// Read an OpenEXR image with three float channels (rgb32f).
///
/// The flow encoder writes its angle/magnitude data to EXR so neither
/// channel goes through 8-bit quantization; the samples come back here
/// exactly as stored.
///
/// # Arguments
///
/// * `file_path` - The path to the EXR file.
///
/// # Returns
///
/// A RGB image with three float channels (rgb32f).
pub fn read_image_exr_rgb32f(file_path: impl AsRef<Path>) -> Result<Image<f32, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path
        .extension()
        .map_or(true, |ext| ext.to_ascii_lowercase() != "exr")
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let img = image::open(file_path)?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let rgb = img.into_rgb32f();

    Ok(Image::new(size, rgb.into_raw())?)
}
