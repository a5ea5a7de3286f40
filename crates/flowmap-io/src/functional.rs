use std::path::Path;

use flowmap_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path as rgb8.
///
/// The method tries to read from any image format supported by the image
/// crate, converting to three 8-bit channels where needed.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // open the file and map it to memory
    let file = std::fs::File::open(file_path)?;
    let mmap = unsafe { memmap2::Mmap::map(&file)? };

    // decode the data directly from memory
    let img = image::ImageReader::new(std::io::Cursor::new(&mmap))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = match img.color() {
        image::ColorType::Rgb8 => Image::new(size, img.into_rgb8().into_raw())?,
        image::ColorType::L8 | image::ColorType::La8 | image::ColorType::Rgba8 => {
            Image::new(size, img.to_rgb8().into_raw())?
        }
        _ => return Err(IoError::UnsupportedImageFormat),
    };

    Ok(image)
}
