use flowmap_image::{Image, ImageError, ImageSize};

/// Create a meshgrid of x and y pixel coordinates.
///
/// # Arguments
///
/// * `rows` - The number of rows indicating the height of the grid
/// * `cols` - The number of columns indicating the width of the grid
///
/// # Returns
///
/// A pair of single-channel planes of shape (rows, cols) where entry
/// (r, c) holds c in the first plane and r in the second.
pub fn meshgrid(rows: usize, cols: usize) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    let mut map_x = Vec::with_capacity(rows * cols);
    for _ in 0..rows {
        for c in 0..cols {
            map_x.push(c as f32);
        }
    }

    let mut map_y = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for _ in 0..cols {
            map_y.push(r as f32);
        }
    }

    let size = ImageSize {
        width: cols,
        height: rows,
    };

    Ok((Image::new(size, map_x)?, Image::new(size, map_y)?))
}

/// Rescale a pixel coordinate grid into the resampler's [-1, 1] range.
///
/// -1 and +1 map to the centers of the first and last pixel along each
/// axis. The `max(extent - 1, 1)` guard keeps 1-pixel extents finite.
/// Values outside [-1, 1] are left as-is and mean out-of-bounds sampling.
pub fn normalize_grid(map_x: &mut Image<f32, 1>, map_y: &mut Image<f32, 1>) {
    let denom_x = (map_x.width().max(2) - 1) as f32;
    let denom_y = (map_y.height().max(2) - 1) as f32;

    map_x
        .as_slice_mut()
        .iter_mut()
        .for_each(|x| *x = 2.0 * *x / denom_x - 1.0);
    map_y
        .as_slice_mut()
        .iter_mut()
        .for_each(|y| *y = 2.0 * *y / denom_y - 1.0);
}

/// Build the normalized sampling grid for a flow field.
///
/// Displaces the base meshgrid by the flow (channel 0 into x, channel 1
/// into y) and normalizes both axes into [-1, 1].
pub fn sampling_grid_from_flow(
    flow: &Image<f32, 2>,
) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    let (mut map_x, mut map_y) = meshgrid(flow.rows(), flow.cols())?;

    map_x
        .as_slice_mut()
        .iter_mut()
        .zip(flow.as_slice().chunks_exact(2))
        .for_each(|(x, d)| *x += d[0]);

    map_y
        .as_slice_mut()
        .iter_mut()
        .zip(flow.as_slice().chunks_exact(2))
        .for_each(|(y, d)| *y += d[1]);

    normalize_grid(&mut map_x, &mut map_y);

    Ok((map_x, map_y))
}
