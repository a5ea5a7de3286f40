use rayon::prelude::*;

use flowmap_image::Image;

/// Controls how the per-pixel resampling step is executed.
///
/// Every output pixel depends only on the source image and its own grid
/// entry, so the strategies are interchangeable and produce identical
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    #[default]
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    ParallelRows,
}

/// Apply a function to each (source, destination) pixel pair, row-parallel.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a grid sampling function to each output pixel.
///
/// `f` receives the (x, y) grid entry for the pixel and the mutable
/// destination pixel slice.
pub fn iter_rows_resample<const C: usize>(
    dst: &mut Image<f32, C>,
    map_x: &Image<f32, 1>,
    map_y: &Image<f32, 1>,
    strategy: ExecutionStrategy,
    f: impl Fn(&f32, &f32, &mut [f32]) + Send + Sync,
) {
    let cols = dst.cols();
    let dst_slice = dst.as_slice_mut();
    let map_x_slice = map_x.as_slice();
    let map_y_slice = map_y.as_slice();

    let row = |(dst_chunk, (map_x_chunk, map_y_chunk)): (&mut [f32], (&[f32], &[f32]))| {
        dst_chunk
            .chunks_exact_mut(C)
            .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
            .for_each(|(dst_pixel, (x, y))| {
                f(x, y, dst_pixel);
            });
    };

    match strategy {
        ExecutionStrategy::Serial => {
            dst_slice
                .chunks_exact_mut(C * cols)
                .zip(map_x_slice.chunks_exact(cols).zip(map_y_slice.chunks_exact(cols)))
                .for_each(row);
        }
        ExecutionStrategy::ParallelRows => {
            dst_slice
                .par_chunks_exact_mut(C * cols)
                .zip(
                    map_x_slice
                        .par_chunks_exact(cols)
                        .zip(map_y_slice.par_chunks_exact(cols)),
                )
                .for_each(|(dst_chunk, maps)| row((dst_chunk, maps)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowmap_image::{ImageError, ImageSize};

    #[test]
    fn par_iter_rows_smoke() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1.0, 2.0, 3.0, 4.0],
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;

        par_iter_rows(&src, &mut dst, |src_pixel, dst_pixel| {
            dst_pixel[0] = src_pixel[0] * 2.0;
        });

        assert_eq!(dst.as_slice(), &[2.0, 4.0, 6.0, 8.0]);
        Ok(())
    }

    #[test]
    fn resample_strategies_match() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let map_x = Image::<f32, 1>::new(size, vec![0.0, 1.0, 2.0, 2.0, 1.0, 0.0])?;
        let map_y = Image::<f32, 1>::new(size, vec![0.0, 0.0, 1.0, 1.0, 0.0, 1.0])?;

        let mut dst_serial = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let mut dst_parallel = Image::<f32, 1>::from_size_val(size, 0.0)?;

        let f = |x: &f32, y: &f32, dst_pixel: &mut [f32]| {
            dst_pixel[0] = x * 10.0 + y;
        };

        iter_rows_resample(&mut dst_serial, &map_x, &map_y, ExecutionStrategy::Serial, f);
        iter_rows_resample(
            &mut dst_parallel,
            &map_x,
            &map_y,
            ExecutionStrategy::ParallelRows,
            f,
        );

        assert_eq!(dst_serial.as_slice(), dst_parallel.as_slice());
        Ok(())
    }
}
