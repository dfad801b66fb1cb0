use medproc_image::{Image, ImageError, PixelBuffer};

use super::descale;
use crate::iter;

/// Fixed point RGB weights of the BT.601 luma, scaled by 2^14.
const RW: i32 = 4899;
const GW: i32 = 9617;
const BW: i32 = 1868;

/// Convert an RGB8 image to grayscale using the formula:
///
/// Y = (4899 * R + 9617 * G + 1868 * B + 2^13) >> 14
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use medproc_image::{Image, ImageSize};
/// use medproc_imgproc::color::gray_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![255, 0, 0, 255, 255, 255],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[76, 255]);
/// ```
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    iter::iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as i32;
        let g = src_pixel[1] as i32;
        let b = src_pixel[2] as i32;
        dst_pixel[0] = descale(r * RW + g * GW + b * BW) as u8;
    });

    Ok(())
}

/// Convert a grayscale image to an RGB image by replicating the grayscale value across all three channels.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output RGB image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_gray<T>(src: &Image<T, 1>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    iter::iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = src_pixel[0];
        dst_pixel[1] = src_pixel[0];
        dst_pixel[2] = src_pixel[0];
    });

    Ok(())
}

/// Derive the single channel luma of a buffer.
///
/// Single channel buffers are returned as a copy, three channel buffers are
/// converted with [`gray_from_rgb_u8`].
pub fn to_luma(src: &PixelBuffer) -> Result<Image<u8, 1>, ImageError> {
    match src {
        PixelBuffer::Gray(img) => Ok(img.clone()),
        PixelBuffer::Rgb(img) => {
            let mut gray = Image::from_size_val(img.size(), 0)?;
            gray_from_rgb_u8(img, &mut gray)?;
            Ok(gray)
        }
    }
}

/// Broadcast a single channel image back to a buffer with `channels` channels.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedChannelCount`] if `channels` is not 1 or 3.
pub fn from_luma(src: &Image<u8, 1>, channels: usize) -> Result<PixelBuffer, ImageError> {
    match channels {
        1 => Ok(PixelBuffer::Gray(src.clone())),
        3 => {
            let mut rgb = Image::from_size_val(src.size(), 0)?;
            rgb_from_gray(src, &mut rgb)?;
            Ok(PixelBuffer::Rgb(rgb))
        }
        c => Err(ImageError::UnsupportedChannelCount(c)),
    }
}
