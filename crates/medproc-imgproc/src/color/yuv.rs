use medproc_image::{Image, ImageError};

use super::descale;
use crate::iter;

// luma weights, 2^14 scaled
const YR: i32 = 4899;
const YG: i32 = 9617;
const YB: i32 = 1868;

// chroma scales, 2^14 scaled
const U_B: i32 = 8061;
const V_R: i32 = 14369;

// inverse transform, 2^14 scaled
const B_U: i32 = 33292;
const G_U: i32 = -6472;
const G_V: i32 = -9519;
const R_V: i32 = 18678;

const DELTA: i32 = 128;

/// Convert an RGB8 image to an 8-bit YUV image.
///
/// The chroma channels are offset by 128 so every channel fits into `[0, 255]`:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
/// U = 0.492 * (B - Y) + 128
/// V = 0.877 * (R - Y) + 128
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output YUV image.
///
/// Precondition: the input and output images must have the same size.
pub fn yuv_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
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

        let y = descale(r * YR + g * YG + b * YB);
        let u = descale((b - y) * U_B + (DELTA << super::SHIFT));
        let v = descale((r - y) * V_R + (DELTA << super::SHIFT));

        dst_pixel[0] = y.clamp(0, 255) as u8;
        dst_pixel[1] = u.clamp(0, 255) as u8;
        dst_pixel[2] = v.clamp(0, 255) as u8;
    });

    Ok(())
}

/// Convert an 8-bit YUV image, as produced by [`yuv_from_rgb_u8`], back to RGB8.
///
/// # Arguments
///
/// * `src` - The input YUV image.
/// * `dst` - The output RGB8 image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_yuv_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    iter::iter_rows(src, dst, |src_pixel, dst_pixel| {
        let y = src_pixel[0] as i32;
        let u = src_pixel[1] as i32 - DELTA;
        let v = src_pixel[2] as i32 - DELTA;

        let r = y + descale(v * R_V);
        let g = y + descale(v * G_V + u * G_U);
        let b = y + descale(u * B_U);

        dst_pixel[0] = r.clamp(0, 255) as u8;
        dst_pixel[1] = g.clamp(0, 255) as u8;
        dst_pixel[2] = b.clamp(0, 255) as u8;
    });

    Ok(())
}
