use num_traits::Zero;
use std::cmp::PartialOrd;

use medproc_image::{Image, ImageError};

use crate::border::BorderMode;
use crate::histogram::compute_histogram;
use crate::iter;

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is greater than the threshold.
///
/// # Examples
///
/// ```
/// use medproc_image::{Image, ImageSize};
/// use medproc_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    iter::iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(())
}

/// Apply an inverse binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is less than or equal to the threshold.
pub fn threshold_binary_inverse<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    iter::iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            T::zero()
        } else {
            max_value
        };
    });

    Ok(())
}

/// Compute the Otsu threshold of a grayscale image.
///
/// The threshold maximizes the between-class variance of the two classes
/// `<= t` and `> t`, which is equivalent to minimizing the intra-class variance.
/// The first maximum wins, and an image with a single intensity yields 0.
///
/// # Arguments
///
/// * `src` - The grayscale input image.
///
/// # Returns
///
/// The threshold value.
pub fn otsu_threshold_value(src: &Image<u8, 1>) -> Result<u8, ImageError> {
    let mut hist = vec![0usize; 256];
    compute_histogram(src, &mut hist, 256)?;

    let total = src.as_slice().len() as f64;
    let mu: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * h as f64)
        .sum::<f64>()
        / total;

    let mut q1 = 0.0f64;
    let mut mu1 = 0.0f64;
    let mut max_sigma = 0.0f64;
    let mut max_val = 0u8;

    for (i, &h) in hist.iter().enumerate() {
        let p_i = h as f64 / total;
        mu1 *= q1;
        q1 += p_i;
        let q2 = 1.0 - q1;

        if q1.min(q2) < f32::EPSILON as f64 || q1.max(q2) > 1.0 - f32::EPSILON as f64 {
            continue;
        }

        mu1 = (mu1 + i as f64 * p_i) / q1;
        let mu2 = (mu - q1 * mu1) / q2;
        let sigma = q1 * q2 * (mu1 - mu2) * (mu1 - mu2);
        if sigma > max_sigma {
            max_sigma = sigma;
            max_val = i as u8;
        }
    }

    Ok(max_val)
}

/// Binarize a grayscale image with its Otsu threshold.
///
/// # Arguments
///
/// * `src` - The grayscale input image.
/// * `dst` - The binary output image, `max_value` above the threshold and 0 elsewhere.
/// * `max_value` - The foreground value.
///
/// # Returns
///
/// The computed threshold.
pub fn threshold_otsu(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    max_value: u8,
) -> Result<u8, ImageError> {
    let threshold = otsu_threshold_value(src)?;
    log::trace!("otsu threshold: {threshold}");
    threshold_binary(src, dst, threshold, max_value)?;
    Ok(threshold)
}

/// Binarize a grayscale image against the mean of each pixel's neighbourhood.
///
/// The local mean is the rounded average of the `block_size x block_size`
/// window with replicated borders. A pixel becomes `max_value` when it is
/// greater than `mean - c`.
///
/// # Arguments
///
/// * `src` - The grayscale input image.
/// * `dst` - The binary output image.
/// * `max_value` - The foreground value.
/// * `block_size` - The odd side length of the neighbourhood.
/// * `c` - The constant subtracted from the mean.
pub fn adaptive_threshold_mean(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    max_value: u8,
    block_size: usize,
    c: i32,
) -> Result<(), ImageError> {
    if block_size < 3 || block_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(block_size));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    let half = (block_size / 2) as isize;
    let border = BorderMode::Replicate;
    let data = src.as_slice();

    // horizontal window sums
    let mut row_sums = vec![0u32; rows * cols];
    for r in 0..rows {
        for col in 0..cols {
            row_sums[r * cols + col] = (-half..=half)
                .map(|d| data[r * cols + border.fold(col as isize + d, cols)] as u32)
                .sum();
        }
    }

    let area = (block_size * block_size) as f64;
    let dst_data = dst.as_slice_mut();
    for r in 0..rows {
        for col in 0..cols {
            let sum: u32 = (-half..=half)
                .map(|d| row_sums[border.fold(r as isize + d, rows) * cols + col])
                .sum();
            let mean = (sum as f64 / area).round() as i32;
            let idx = r * cols + col;
            dst_data[idx] = if data[idx] as i32 > mean - c {
                max_value
            } else {
                0
            };
        }
    }

    Ok(())
}
