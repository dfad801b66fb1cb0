use medproc_image::{map_buffer, Image, ImageError, PixelBuffer};
use medproc_imgproc::{
    color::{from_luma, to_luma},
    filter::{bilateral_filter, canny, gaussian_blur, kernels::odd_kernel_size, median_blur, sharpen},
};

use crate::params::FilterMode;

/// Bilateral filter standard deviation, both in color and in space.
const BILATERAL_SIGMA: f32 = 75.0;

/// Canny hysteresis thresholds.
const CANNY_LOW: i32 = 50;
const CANNY_HIGH: i32 = 150;

/// Apply the spatial filter selected by `mode`.
///
/// # Arguments
///
/// * `src` - The input buffer.
/// * `mode` - The filter to apply.
/// * `kernel_size` - The kernel size, an even size is bumped to the next odd one.
///   Unused by the sharpening and the edge detection.
///
/// # Errors
///
/// Returns [`ImageError::InvalidKernelSize`] for a zero kernel size.
pub fn apply_filter(
    src: &PixelBuffer,
    mode: FilterMode,
    kernel_size: usize,
) -> Result<PixelBuffer, ImageError> {
    let kernel_size = odd_kernel_size(kernel_size)?;
    log::debug!("filter stage: {mode:?}, kernel size {kernel_size}");

    let out = match mode {
        FilterMode::None => src.clone(),
        FilterMode::Gaussian => map_buffer!(src, |img| {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            gaussian_blur(img, &mut dst, kernel_size)?;
            dst
        }),
        FilterMode::Median => map_buffer!(src, |img| {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            median_blur(img, &mut dst, kernel_size)?;
            dst
        }),
        FilterMode::Bilateral => map_buffer!(src, |img| {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            bilateral_filter(img, &mut dst, kernel_size, BILATERAL_SIGMA, BILATERAL_SIGMA)?;
            dst
        }),
        FilterMode::Sharpen => map_buffer!(src, |img| {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            sharpen(img, &mut dst)?;
            dst
        }),
        FilterMode::Edge => {
            let luma = to_luma(src)?;
            let mut edges = Image::from_size_val(luma.size(), 0)?;
            canny(&luma, &mut edges, CANNY_LOW, CANNY_HIGH)?;
            from_luma(&edges, src.channels())?
        }
    };

    Ok(out)
}
