use flowmap_image::{Image, ImageError};

use crate::grid::sampling_grid_from_flow;
use crate::interpolation::bilinear_interpolation;
use crate::parallel::{self, ExecutionStrategy};

/// Sample an image at the normalized grid coordinates.
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container with shape (height, width, C).
/// * `map_x` - The normalized x coordinates to sample, in [-1, 1].
/// * `map_y` - The normalized y coordinates to sample, in [-1, 1].
/// * `strategy` - How to execute the per-pixel resampling.
///
/// -1 and +1 map to the first and last pixel centers of `src`. Coordinates
/// outside that range sample into the zero padding.
///
/// # Errors
///
/// * The map_x and map_y must have the same size.
/// * The output image must have the same size as map_x and map_y.
pub fn grid_sample<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    map_x: &Image<f32, 1>,
    map_y: &Image<f32, 1>,
    strategy: ExecutionStrategy,
) -> Result<(), ImageError> {
    if map_x.size() != map_y.size() {
        return Err(ImageError::InvalidImageSize(
            map_x.cols(),
            map_x.rows(),
            map_y.cols(),
            map_y.rows(),
        ));
    }

    if dst.size() != map_x.size() {
        return Err(ImageError::InvalidImageSize(
            map_x.cols(),
            map_x.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let scale_u = 0.5 * (src.cols() - 1) as f32;
    let scale_v = 0.5 * (src.rows() - 1) as f32;

    parallel::iter_rows_resample(dst, map_x, map_y, strategy, |&x, &y, dst_pixel| {
        let u = (x + 1.0) * scale_u;
        let v = (y + 1.0) * scale_v;

        let pixel = bilinear_interpolation(src, u, v);
        dst_pixel.copy_from_slice(&pixel);
    });

    Ok(())
}

/// Warp an image by a dense optical flow field.
///
/// Each output pixel is sampled from its own coordinate displaced by the
/// flow (x by channel 0, y by channel 1, pixel units), with bilinear
/// interpolation and zero padding outside the image.
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container, same size as `src`.
/// * `flow` - The flow field with shape (height, width, 2), same extent as `src`.
/// * `strategy` - How to execute the per-pixel resampling.
///
/// # Errors
///
/// The flow field and the output image must have the same size as `src`;
/// a mismatch is rejected before any computation.
///
/// # Example
///
/// ```
/// use flowmap_image::{Image, ImageSize};
/// use flowmap_warp::parallel::ExecutionStrategy;
/// use flowmap_warp::warp::warp_by_flow;
///
/// let size = ImageSize { width: 4, height: 3 };
/// let src = Image::<f32, 3>::from_size_val(size, 1.0).unwrap();
/// let flow = Image::<f32, 2>::from_size_val(size, 0.0).unwrap();
/// let mut dst = Image::<f32, 3>::from_size_val(size, 0.0).unwrap();
///
/// warp_by_flow(&src, &mut dst, &flow, ExecutionStrategy::default()).unwrap();
///
/// for (a, b) in dst.as_slice().iter().zip(src.as_slice().iter()) {
///     assert!((a - b).abs() < 1e-4);
/// }
/// ```
pub fn warp_by_flow<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    flow: &Image<f32, 2>,
    strategy: ExecutionStrategy,
) -> Result<(), ImageError> {
    if flow.size() != src.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            flow.cols(),
            flow.rows(),
        ));
    }

    if dst.size() != src.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (map_x, map_y) = sampling_grid_from_flow(flow)?;

    grid_sample(src, dst, &map_x, &map_y, strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowmap_image::ImageSize;

    fn assert_close(actual: &[f32], expected: &[f32], tol: f32) {
        assert_eq!(actual.len(), expected.len());
        for (a, b) in actual.iter().zip(expected.iter()) {
            assert!((a - b).abs() < tol, "{a} != {b}");
        }
    }

    #[test]
    fn identity_flow_reproduces_image() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 4,
        };
        let data = (0..size.width * size.height * 3)
            .map(|i| i as f32)
            .collect::<Vec<_>>();
        let src = Image::<f32, 3>::new(size, data)?;
        let flow = Image::<f32, 2>::from_size_val(size, 0.0)?;
        let mut dst = Image::<f32, 3>::from_size_val(size, 0.0)?;

        warp_by_flow(&src, &mut dst, &flow, ExecutionStrategy::Serial)?;

        assert_close(dst.as_slice(), src.as_slice(), 1e-4);
        Ok(())
    }

    #[test]
    fn output_shape_matches_input() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 7,
            height: 3,
        };
        let src = Image::<f32, 3>::from_size_val(size, 0.5)?;
        let flow = Image::<f32, 2>::from_size_val(size, 1.5)?;
        let mut dst = Image::<f32, 3>::from_size_val(size, 0.0)?;

        warp_by_flow(&src, &mut dst, &flow, ExecutionStrategy::Serial)?;

        assert_eq!(dst.size(), src.size());
        assert_eq!(dst.num_channels(), 3);
        Ok(())
    }

    #[test]
    fn far_out_of_bounds_flow_zeroes_output() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let src = Image::<f32, 3>::from_size_val(size, 200.0)?;
        let flow = Image::<f32, 2>::from_size_val(size, 10000.0)?;
        let mut dst = Image::<f32, 3>::from_size_val(size, 1.0)?;

        warp_by_flow(&src, &mut dst, &flow, ExecutionStrategy::Serial)?;

        assert!(dst.as_slice().iter().all(|&x| x == 0.0));
        Ok(())
    }

    #[test]
    fn extreme_flow_values_stay_total() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let src = Image::<f32, 3>::from_size_val(size, 200.0)?;
        let flow = Image::<f32, 2>::from_size_val(size, f32::MAX)?;
        let mut dst = Image::<f32, 3>::from_size_val(size, 1.0)?;

        warp_by_flow(&src, &mut dst, &flow, ExecutionStrategy::Serial)?;

        assert!(dst.as_slice().iter().all(|&x| x == 0.0));
        Ok(())
    }

    #[test]
    fn half_pixel_displacement_blends_neighbors() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let src = Image::<f32, 1>::new(size, vec![0.0, 100.0, 200.0, 300.0])?;

        // +0.5 px in x at output (0, 0) only
        let mut flow_data = vec![0.0; 2 * 2 * 2];
        flow_data[0] = 0.5;
        let flow = Image::<f32, 2>::new(size, flow_data)?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;

        warp_by_flow(&src, &mut dst, &flow, ExecutionStrategy::Serial)?;

        assert_close(dst.as_slice(), &[50.0, 100.0, 200.0, 300.0], 1e-4);
        Ok(())
    }

    #[test]
    fn single_pixel_image_stays_defined() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 1,
            height: 1,
        };
        let src = Image::<f32, 3>::new(size, vec![10.0, 20.0, 30.0])?;
        let flow = Image::<f32, 2>::new(size, vec![123.0, -456.0])?;
        let mut dst = Image::<f32, 3>::from_size_val(size, 0.0)?;

        warp_by_flow(&src, &mut dst, &flow, ExecutionStrategy::Serial)?;

        assert!(dst.as_slice().iter().all(|x| x.is_finite()));
        Ok(())
    }

    #[test]
    fn flow_size_mismatch_is_rejected() -> Result<(), ImageError> {
        let src = Image::<f32, 3>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0.0,
        )?;
        let flow = Image::<f32, 2>::from_size_val(
            ImageSize {
                width: 4,
                height: 5,
            },
            0.0,
        )?;
        let mut dst = Image::<f32, 3>::from_size_val(src.size(), 0.0)?;

        let result = warp_by_flow(&src, &mut dst, &flow, ExecutionStrategy::Serial);
        assert!(matches!(result, Err(ImageError::InvalidImageSize(..))));
        Ok(())
    }

    #[test]
    fn serial_and_parallel_agree() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 9,
            height: 6,
        };
        let data = (0..size.width * size.height * 3)
            .map(|i| (i % 251) as f32)
            .collect::<Vec<_>>();
        let src = Image::<f32, 3>::new(size, data)?;

        let flow_data = (0..size.width * size.height * 2)
            .map(|i| ((i % 7) as f32 - 3.0) * 0.25)
            .collect::<Vec<_>>();
        let flow = Image::<f32, 2>::new(size, flow_data)?;

        let mut dst_serial = Image::<f32, 3>::from_size_val(size, 0.0)?;
        let mut dst_parallel = Image::<f32, 3>::from_size_val(size, 0.0)?;

        warp_by_flow(&src, &mut dst_serial, &flow, ExecutionStrategy::Serial)?;
        warp_by_flow(&src, &mut dst_parallel, &flow, ExecutionStrategy::ParallelRows)?;

        assert_eq!(dst_serial.as_slice(), dst_parallel.as_slice());
        Ok(())
    }

    #[test]
    fn negative_flow_shifts_content() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 1,
        };
        let src = Image::<f32, 1>::new(size, vec![10.0, 20.0, 30.0])?;
        // every output pixel samples one pixel to its right
        let flow_data = vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let flow = Image::<f32, 2>::new(size, flow_data)?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;

        warp_by_flow(&src, &mut dst, &flow, ExecutionStrategy::Serial)?;

        // the last pixel samples past the border into the zero padding
        assert_close(dst.as_slice(), &[20.0, 30.0, 0.0], 1e-4);
        Ok(())
    }
}
