use medproc_image::{map_buffer, Image, ImageError, PixelBuffer};
use medproc_imgproc::adjust::{adjust_brightness, adjust_contrast, apply_lut, gamma_lut};

/// Apply brightness, contrast and gamma, in that order.
///
/// Every adjustment is channel independent and saturates to `[0, 255]`. An
/// adjustment at its neutral value is skipped.
///
/// # Arguments
///
/// * `src` - The input buffer.
/// * `brightness` - The offset added to every sample.
/// * `contrast` - The contrast scale, samples become `round(contrast * sample)`.
/// * `gamma` - The gamma exponent, samples become `round(255 * (sample / 255)^(1 / gamma))`.
pub fn adjust_photometric(
    src: &PixelBuffer,
    brightness: i32,
    contrast: f32,
    gamma: f32,
) -> Result<PixelBuffer, ImageError> {
    log::debug!("photometric stage: brightness {brightness}, contrast {contrast}, gamma {gamma}");

    let mut out = src.clone();

    if brightness != 0 {
        out = map_buffer!(&out, |img| {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            adjust_brightness(img, &mut dst, brightness)?;
            dst
        });
    }

    if contrast != 1.0 {
        out = map_buffer!(&out, |img| {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            adjust_contrast(img, &mut dst, contrast)?;
            dst
        });
    }

    if gamma != 1.0 {
        let lut = gamma_lut(gamma)?;
        out = map_buffer!(&out, |img| {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            apply_lut(img, &mut dst, &lut)?;
            dst
        });
    }

    Ok(out)
}
