use medproc_image::{map_buffer, ImageError, PixelBuffer};
use medproc_imgproc::{
    filter::kernels::odd_kernel_size,
    morphology::{close, dilate, erode, open, Kernel},
};

use crate::params::MorphologyMode;

/// Apply one pass of the morphological operation selected by `mode`.
///
/// The structuring element is a square box of side `kernel_size`, an even
/// size is bumped to the next odd one. All channels are processed independently.
pub fn apply_morphology(
    src: &PixelBuffer,
    mode: MorphologyMode,
    kernel_size: usize,
) -> Result<PixelBuffer, ImageError> {
    let kernel_size = odd_kernel_size(kernel_size)?;
    log::debug!("morphology stage: {mode:?}, kernel size {kernel_size}");

    if mode == MorphologyMode::None {
        return Ok(src.clone());
    }

    let kernel = Kernel::box_kernel(kernel_size)?;
    let out = map_buffer!(src, |img| {
        let mut dst = img.clone();
        match mode {
            MorphologyMode::None => {}
            MorphologyMode::Erode => erode(img, &mut dst, &kernel, 1)?,
            MorphologyMode::Dilate => dilate(img, &mut dst, &kernel, 1)?,
            MorphologyMode::Open => open(img, &mut dst, &kernel, 1)?,
            MorphologyMode::Close => close(img, &mut dst, &kernel, 1)?,
        }
        dst
    });

    Ok(out)
}
