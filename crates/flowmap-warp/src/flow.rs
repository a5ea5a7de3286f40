use flowmap_image::{Image, ImageError};

use crate::parallel;

/// Extract the per-pixel (angle, magnitude) pair from a flow-encoded RGB image.
///
/// The encoder stores the flow direction in the hue and the magnitude in
/// the saturation of an HSV interpretation of the image. This is the
/// float-image convention: the hue is kept in degrees [0, 360) and the
/// saturation is the chroma fraction delta / max in [0, 1].
///
/// # Arguments
///
/// * `src` - The flow-encoded RGB image, floating point samples.
/// * `dst` - The output image with channel 0 = angle, channel 1 = magnitude.
///
/// # Errors
///
/// Both images must have the same size.
pub fn polar_from_rgb(src: &Image<f32, 3>, dst: &mut Image<f32, 2>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0];
        let g = src_pixel[1];
        let b = src_pixel[2];

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (((g - b) / delta) % 6.0)
        } else if max == g {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };

        // keep h in [0, 360)
        let h = if h < 0.0 { h + 360.0 } else { h };

        let s = if max == 0.0 { 0.0 } else { delta / max };

        dst_pixel[0] = h;
        dst_pixel[1] = s;
    });

    Ok(())
}

/// Convert an (angle, magnitude) field into a Cartesian flow field.
///
/// The magnitude is stored as a fraction of the image extent, so dx is
/// scaled by the width and dy by the height. Both components are negated:
/// the encoder stores the direction inverted relative to the forward
/// displacement, and this conversion is a bit-exact contract with it.
///
/// # Arguments
///
/// * `src` - The polar field with channel 0 = angle in degrees, channel 1 = magnitude.
/// * `dst` - The output flow field with channel 0 = dx, channel 1 = dy in pixel units.
///
/// # Errors
///
/// Both images must have the same size.
pub fn flow_from_polar(src: &Image<f32, 2>, dst: &mut Image<f32, 2>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let w = src.width() as f32;
    let h = src.height() as f32;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let (ang, mag) = (src_pixel[0].to_radians(), src_pixel[1]);
        dst_pixel[0] = -w * mag * ang.cos();
        dst_pixel[1] = -h * mag * ang.sin();
    });

    Ok(())
}

/// Decode a flow-encoded RGB image into a Cartesian flow field.
pub fn flow_from_rgb(src: &Image<f32, 3>) -> Result<Image<f32, 2>, ImageError> {
    let mut polar = Image::<f32, 2>::from_size_val(src.size(), 0.0)?;
    polar_from_rgb(src, &mut polar)?;

    let mut flow = Image::<f32, 2>::from_size_val(src.size(), 0.0)?;
    flow_from_polar(&polar, &mut flow)?;

    Ok(flow)
}
