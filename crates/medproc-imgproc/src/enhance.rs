use medproc_image::{Image, ImageError};

use crate::clahe::clahe;
use crate::color::{lab_from_rgb_u8, rgb_from_lab_u8, rgb_from_yuv_u8, yuv_from_rgb_u8};
use crate::filter::gaussian_blur;
use crate::histogram::equalize_histogram;
use crate::iter;

/// Performs weighted addition of two 8-bit images `src1` and `src2` with weights `alpha`
/// and `beta`, and a scalar `gamma`. The formula used is:
///
/// dst(x,y,c) = clamp(round(src1(x,y,c) * alpha + src2(x,y,c) * beta + gamma), 0, 255)
///
/// # Arguments
///
/// * `src1` - The first input image.
/// * `alpha` - Weight of the first image elements to be multiplied.
/// * `src2` - The second input image.
/// * `beta` - Weight of the second image elements to be multiplied.
/// * `gamma` - Scalar added to each sum.
/// * `dst` - The output image.
///
/// # Errors
///
/// Returns an error if the sizes of `src1`, `src2` and `dst` do not match.
pub fn add_weighted<const C: usize>(
    src1: &Image<u8, C>,
    alpha: f32,
    src2: &Image<u8, C>,
    beta: f32,
    gamma: f32,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    if src1.size() != src2.size() {
        return Err(ImageError::InvalidImageSize(
            src1.cols(),
            src1.rows(),
            src2.cols(),
            src2.rows(),
        ));
    }

    if src1.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src1.width(),
            src1.height(),
            dst.width(),
            dst.height(),
        ));
    }

    iter::iter_rows_val_two(src1, src2, dst, |&src1_val, &src2_val, dst_val| {
        let v = src1_val as f32 * alpha + src2_val as f32 * beta + gamma;
        *dst_val = v.round().clamp(0.0, 255.0) as u8;
    });

    Ok(())
}

/// Rescale every channel linearly so that its samples span `[0, 255]`.
///
/// out = floor(255 * (in - min) / (max - min))
///
/// A flat channel (`max == min`) has no range to stretch and is copied unchanged.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The stretched output image.
///
/// # Example
///
/// ```
/// use medproc_image::{Image, ImageSize};
/// use medproc_imgproc::enhance::contrast_stretch;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![50, 100, 150]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// contrast_stretch(&image, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 127, 255]);
/// ```
pub fn contrast_stretch<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let mut min = [u8::MAX; C];
    let mut max = [u8::MIN; C];
    for pixel in src.as_slice().chunks_exact(C) {
        for ch in 0..C {
            min[ch] = min[ch].min(pixel[ch]);
            max[ch] = max[ch].max(pixel[ch]);
        }
    }

    for ch in 0..C {
        if min[ch] == max[ch] {
            log::debug!("contrast stretch: channel {ch} is flat ({}), kept", min[ch]);
        }
    }

    iter::iter_rows(src, dst, |src_pixel, dst_pixel| {
        for ch in 0..C {
            let range = (max[ch] - min[ch]) as u32;
            dst_pixel[ch] = if range == 0 {
                src_pixel[ch]
            } else {
                ((src_pixel[ch] - min[ch]) as u32 * 255 / range) as u8
            };
        }
    });

    Ok(())
}

/// Sharpen an image by unsharp masking.
///
/// The image is blurred with a 5x5 gaussian kernel and the output is
/// `clamp(1.5 * src - 0.5 * blurred, 0, 255)`.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The sharpened output image.
pub fn unsharp_mask<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    let mut blurred = Image::from_size_val(src.size(), 0u8)?;
    gaussian_blur(src, &mut blurred, 5)?;
    add_weighted(src, 1.5, &blurred, -0.5, 0.0, dst)
}

/// Equalize the luma histogram of an RGB8 image, leaving its chroma untouched.
///
/// The image goes through an 8-bit YUV round trip, see [`yuv_from_rgb_u8`].
pub fn equalize_histogram_rgb(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    let mut yuv = Image::from_size_val(src.size(), 0u8)?;
    yuv_from_rgb_u8(src, &mut yuv)?;

    let luma = yuv.channel(0)?;
    let mut equalized = Image::from_size_val(src.size(), 0u8)?;
    equalize_histogram(&luma, &mut equalized)?;
    yuv.set_channel(0, &equalized)?;

    rgb_from_yuv_u8(&yuv, dst)
}

/// Apply [`clahe`] to the lightness of an RGB8 image.
///
/// The image goes through an 8-bit CIE Lab round trip, see [`lab_from_rgb_u8`].
pub fn clahe_rgb(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    clip_limit: f32,
    tiles_x: usize,
    tiles_y: usize,
) -> Result<(), ImageError> {
    let mut lab = Image::from_size_val(src.size(), 0u8)?;
    lab_from_rgb_u8(src, &mut lab)?;

    let lightness = lab.channel(0)?;
    let mut equalized = Image::from_size_val(src.size(), 0u8)?;
    clahe(&lightness, &mut equalized, clip_limit, tiles_x, tiles_y)?;
    lab.set_channel(0, &equalized)?;

    rgb_from_lab_u8(&lab, dst)
}

#[cfg(test)]
mod tests {
    use medproc_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_add_weighted() -> Result<(), ImageError> {
        let src1 = Image::<u8, 1>::new([4, 1].into(), vec![10, 100, 200, 0])?;
        let src2 = Image::<u8, 1>::new([4, 1].into(), vec![10, 50, 0, 255])?;
        let mut dst = Image::<u8, 1>::from_size_val(src1.size(), 0)?;
        super::add_weighted(&src1, 1.5, &src2, -0.5, 0.0, &mut dst)?;
        assert_eq!(dst.as_slice(), &[10, 125, 255, 0]);
        Ok(())
    }

    #[test]
    fn test_add_weighted_size_mismatch() -> Result<(), ImageError> {
        let src1 = Image::<u8, 1>::from_size_val([4, 1].into(), 0)?;
        let src2 = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val([4, 1].into(), 0)?;
        assert!(super::add_weighted(&src1, 1.0, &src2, 1.0, 0.0, &mut dst).is_err());
        Ok(())
    }

    #[test]
    fn test_contrast_stretch_per_channel() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<u8, 3>::new(
            ImageSize { width: 2, height: 1 },
            vec![
                10, 0, 7,
                20, 255, 7,
            ],
        )?;
        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
        super::contrast_stretch(&src, &mut dst)?;
        assert_eq!(dst.as_slice(), &[0, 0, 7, 255, 255, 7]);
        Ok(())
    }

    #[test]
    fn test_contrast_stretch_flat_is_unchanged() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([4, 4].into(), 100)?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        super::contrast_stretch(&src, &mut dst)?;
        assert_eq!(dst.as_slice(), &[100; 16]);
        Ok(())
    }

    #[test]
    fn test_unsharp_mask_flat() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::from_size_val([6, 6].into(), 90)?;
        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
        super::unsharp_mask(&src, &mut dst)?;
        assert_eq!(dst.as_slice(), src.as_slice());
        Ok(())
    }

    #[test]
    fn test_unsharp_mask_boosts_edge() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 8,
            height: 1,
        };
        let src = Image::<u8, 1>::new(size, vec![50, 50, 50, 50, 150, 150, 150, 150])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        super::unsharp_mask(&src, &mut dst)?;
        assert!(*dst.get_pixel(3, 0, 0)? < 50);
        assert!(*dst.get_pixel(4, 0, 0)? > 150);
        Ok(())
    }

    #[test]
    fn test_equalize_rgb_gray_input() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new(
            [3, 1].into(),
            vec![50, 50, 50, 100, 100, 100, 150, 150, 150],
        )?;
        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
        super::equalize_histogram_rgb(&src, &mut dst)?;
        // neutral chroma stays neutral, lut maps 50 -> 0, 100 -> 128, 150 -> 255
        assert_eq!(dst.as_slice(), &[0, 0, 0, 128, 128, 128, 255, 255, 255]);
        Ok(())
    }

    #[test]
    fn test_clahe_rgb_keeps_size() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::from_size_val([16, 16].into(), 60)?;
        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
        super::clahe_rgb(&src, &mut dst, 2.0, 8, 8)?;
        let first = &dst.as_slice()[..3];
        assert!(dst.as_slice().chunks_exact(3).all(|p| p == first));
        Ok(())
    }
}
