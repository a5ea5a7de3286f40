use flowmap_image::Image;

/// Kernel for bilinear interpolation with zero padding.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate, in pixel units.
/// * `v` - The y coordinate of the pixel to interpolate, in pixel units.
///
/// # Returns
///
/// The interpolated pixel values. Stencil corners that fall outside the
/// image contribute zero intensity, per corner, so coordinates near the
/// border blend valid samples with zero.
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows() as i64, image.cols() as i64);

    // coordinates this far out have no valid stencil corner, and huge or
    // non-finite values must not reach the integer casts below
    if !(u > -1.0 && u < cols as f32 && v > -1.0 && v < rows as f32) {
        return [0.0; C];
    }

    let u0 = u.floor();
    let v0 = v.floor();

    let iu0 = u0 as i64;
    let iv0 = v0 as i64;
    let iu1 = iu0 + 1;
    let iv1 = iv0 + 1;

    let frac_u = u - u0;
    let frac_v = v - v0;

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let w00 = frac_uu * frac_vv;
    let w01 = frac_u * frac_vv;
    let w10 = frac_uu * frac_v;
    let w11 = frac_u * frac_v;

    let data = image.as_slice();

    let corner = |iu: i64, iv: i64| -> Option<&[f32]> {
        if iu < 0 || iu >= cols || iv < 0 || iv >= rows {
            return None;
        }
        let base = ((iv * cols + iu) as usize) * C;
        Some(&data[base..base + C])
    };

    let mut pixel = [0.0; C];
    for (w, p) in [
        (w00, corner(iu0, iv0)),
        (w01, corner(iu1, iv0)),
        (w10, corner(iu0, iv1)),
        (w11, corner(iu1, iv1)),
    ] {
        if let Some(p) = p {
            for k in 0..C {
                pixel[k] += p[k] * w;
            }
        }
    }

    pixel
}
