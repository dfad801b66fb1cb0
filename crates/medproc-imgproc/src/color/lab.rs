use medproc_image::{Image, ImageError};

use crate::iter;

// D65 reference white
const XN: f32 = 0.950456;
const ZN: f32 = 1.088754;

const EPSILON: f32 = 0.008856;
const KAPPA: f32 = 903.3;

#[rustfmt::skip]
const RGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

#[rustfmt::skip]
const XYZ_TO_RGB: [[f32; 3]; 3] = [
    [ 3.240479, -1.537150, -0.498535],
    [-0.969256,  1.875991,  0.041556],
    [ 0.055648, -0.204043,  1.057311],
];

#[inline]
fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(v: f32) -> f32 {
    if v <= 0.0031308 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

#[inline]
fn lab_f_inv(f: f32) -> f32 {
    let t = f * f * f;
    if t > EPSILON {
        t
    } else {
        (f - 16.0 / 116.0) / 7.787
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert an RGB8 image to an 8-bit CIE Lab image (D65 white point).
///
/// The channels are stored as `L * 255 / 100`, `a + 128` and `b + 128`.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output Lab image.
///
/// Precondition: the input and output images must have the same size.
pub fn lab_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    iter::iter_rows(src, dst, |src_pixel, dst_pixel| {
        let rgb = [
            srgb_to_linear(src_pixel[0] as f32 / 255.0),
            srgb_to_linear(src_pixel[1] as f32 / 255.0),
            srgb_to_linear(src_pixel[2] as f32 / 255.0),
        ];
        let [x, y, z] = RGB_TO_XYZ.map(|row| row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]);

        let (fx, fy, fz) = (lab_f(x / XN), lab_f(y), lab_f(z / ZN));
        let l = if y > EPSILON {
            116.0 * fy - 16.0
        } else {
            KAPPA * y
        };
        let a = 500.0 * (fx - fy);
        let b = 200.0 * (fy - fz);

        dst_pixel[0] = to_u8(l * 255.0 / 100.0);
        dst_pixel[1] = to_u8(a + 128.0);
        dst_pixel[2] = to_u8(b + 128.0);
    });

    Ok(())
}

/// Convert an 8-bit CIE Lab image, as produced by [`lab_from_rgb_u8`], back to RGB8.
///
/// # Arguments
///
/// * `src` - The input Lab image.
/// * `dst` - The output RGB8 image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_lab_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    iter::iter_rows(src, dst, |src_pixel, dst_pixel| {
        let l = src_pixel[0] as f32 * 100.0 / 255.0;
        let a = src_pixel[1] as f32 - 128.0;
        let b = src_pixel[2] as f32 - 128.0;

        let fy = (l + 16.0) / 116.0;
        let y = if l <= KAPPA * EPSILON {
            l / KAPPA
        } else {
            fy * fy * fy
        };
        let x = lab_f_inv(fy + a / 500.0) * XN;
        let z = lab_f_inv(fy - b / 200.0) * ZN;

        let rgb = XYZ_TO_RGB.map(|row| row[0] * x + row[1] * y + row[2] * z);
        for (d, v) in dst_pixel.iter_mut().zip(rgb) {
            *d = to_u8(linear_to_srgb(v.clamp(0.0, 1.0)) * 255.0);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use medproc_image::{Image, ImageError, ImageSize};

    #[test]
    fn lab_extremes() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![0, 0, 0, 255, 255, 255],
        )?;
        let mut lab = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::lab_from_rgb_u8(&image, &mut lab)?;
        assert_eq!(lab.as_slice(), &[0, 128, 128, 255, 128, 128]);
        Ok(())
    }

    #[test]
    fn lab_roundtrip_is_close() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 3>::new(
            ImageSize { width: 4, height: 1 },
            vec![
                200, 30, 40,
                10, 180, 60,
                70, 80, 220,
                128, 128, 128,
            ],
        )?;
        let mut lab = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        let mut rgb = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::lab_from_rgb_u8(&image, &mut lab)?;
        super::rgb_from_lab_u8(&lab, &mut rgb)?;

        for (a, b) in image.as_slice().iter().zip(rgb.as_slice()) {
            assert!((*a as i32 - *b as i32).abs() <= 4, "{a} vs {b}");
        }
        Ok(())
    }
}
