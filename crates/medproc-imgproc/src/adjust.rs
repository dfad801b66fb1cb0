use medproc_image::{Image, ImageError};

use crate::iter;

/// Add a constant offset to every sample of an 8-bit image with saturation.
///
/// dst(x,y,c) = clamp(src(x,y,c) + offset, 0, 255)
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `offset` - The brightness offset.
///
/// # Errors
///
/// Returns an error if the sizes of `src` and `dst` do not match.
///
/// # Example
///
/// ```
/// use medproc_image::{Image, ImageSize};
/// use medproc_imgproc::adjust::adjust_brightness;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![0, 100, 250]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// adjust_brightness(&image, &mut dst, 10).unwrap();
/// assert_eq!(dst.as_slice(), &[10, 110, 255]);
/// ```
pub fn adjust_brightness<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    offset: i32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    iter::iter_rows_val(src, dst, |&src_val, dst_val| {
        *dst_val = (src_val as i32 + offset).clamp(0, 255) as u8;
    });

    Ok(())
}

/// Scale every sample of an 8-bit image with rounding and saturation.
///
/// dst(x,y,c) = clamp(round(alpha * src(x,y,c)), 0, 255)
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `alpha` - The non negative contrast scale.
///
/// # Errors
///
/// Returns an error if the sizes do not match or `alpha` is negative or not finite.
pub fn adjust_contrast<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    alpha: f32,
) -> Result<(), ImageError> {
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(ImageError::InvalidParameter("alpha", alpha as f64));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // a lookup table is exact for 8-bit inputs
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = (alpha * i as f32).round().clamp(0.0, 255.0) as u8;
    }

    apply_lut(src, dst, &lut)
}

/// Build the 256 entries gamma correction table.
///
/// T[i] = round(255 * (i / 255) ^ (1 / gamma))
///
/// # Arguments
///
/// * `gamma` - The strictly positive gamma value.
///
/// # Returns
///
/// The lookup table, monotonic non decreasing for any valid gamma.
///
/// # Errors
///
/// Returns an error if `gamma` is not strictly positive and finite.
pub fn gamma_lut(gamma: f32) -> Result<[u8; 256], ImageError> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(ImageError::InvalidParameter("gamma", gamma as f64));
    }

    let inv_gamma = 1.0 / gamma as f64;
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        let normalized = i as f64 / 255.0;
        *v = (255.0 * normalized.powf(inv_gamma)).round().clamp(0.0, 255.0) as u8;
    }

    Ok(lut)
}

/// Apply a 256 entries lookup table to every sample of an 8-bit image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `lut` - The lookup table indexed by the input sample.
pub fn apply_lut<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    lut: &[u8; 256],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    iter::iter_rows_val(src, dst, |&src_val, dst_val| {
        *dst_val = lut[src_val as usize];
    });

    Ok(())
}
