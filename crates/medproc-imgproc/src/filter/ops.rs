use medproc_image::{Image, ImageError};

use super::{kernels, separable_filter};
use crate::border::BorderMode;

/// Blur an 8-bit image using a gaussian blur filter.
///
/// The kernel is square and its sigma is derived from the size, see
/// [`kernels::gaussian_kernel_1d_auto`]. Borders are reflected without repeating the edge.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The odd size of the kernel.
pub fn gaussian_blur<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel_size: usize,
) -> Result<(), ImageError> {
    let kernel = kernels::gaussian_kernel_1d_auto(kernel_size)?;
    separable_filter(src, dst, &kernel, &kernel, BorderMode::Reflect101)
}

/// Convolve an 8-bit image with a square 2D kernel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The row-major kernel coefficients.
/// * `kernel_size` - The odd side length of the kernel.
/// * `border` - How samples outside the image are read.
///
/// The output is rounded and saturated to `[0, 255]`.
pub fn filter2d<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel: &[f32],
    kernel_size: usize,
    border: BorderMode,
) -> Result<(), ImageError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    if kernel.len() != kernel_size * kernel_size {
        return Err(ImageError::InvalidKernelLength(
            kernel.len(),
            kernel_size * kernel_size,
        ));
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
    let half = (kernel_size / 2) as isize;
    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();

    for r in 0..rows {
        for c in 0..cols {
            let mut acc = [0.0f32; C];
            for (i, row_kernel) in kernel.chunks_exact(kernel_size).enumerate() {
                let y = border.fold(r as isize + i as isize - half, rows);
                for (j, &k) in row_kernel.iter().enumerate() {
                    let x = border.fold(c as isize + j as isize - half, cols);
                    let idx = (y * cols + x) * C;
                    for (ch, acc_val) in acc.iter_mut().enumerate() {
                        *acc_val += src_data[idx + ch] as f32 * k;
                    }
                }
            }

            let out_idx = (r * cols + c) * C;
            for (ch, &acc_val) in acc.iter().enumerate() {
                dst_data[out_idx + ch] = acc_val.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(())
}

/// Sharpen an 8-bit image with the fixed 3x3 kernel [`kernels::SHARPEN_KERNEL`].
///
/// Borders replicate the edge pixels.
pub fn sharpen<const C: usize>(src: &Image<u8, C>, dst: &mut Image<u8, C>) -> Result<(), ImageError> {
    filter2d(src, dst, &kernels::SHARPEN_KERNEL, 3, BorderMode::Replicate)
}
