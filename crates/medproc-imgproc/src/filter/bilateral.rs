use medproc_image::{Image, ImageError};

use crate::border::BorderMode;

/// Smooth an 8-bit image while preserving its edges.
///
/// Each output pixel is the average of the pixels inside a circular window of
/// radius `diameter / 2`, weighted by their spatial distance and by the color
/// distance to the center pixel. The color distance is the sum of the absolute
/// channel differences. Borders are reflected without repeating the edge.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `diameter` - The diameter of the pixel neighbourhood.
/// * `sigma_color` - The standard deviation in the color space.
/// * `sigma_space` - The standard deviation in the coordinate space.
pub fn bilateral_filter<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    diameter: usize,
    sigma_color: f32,
    sigma_space: f32,
) -> Result<(), ImageError> {
    if diameter == 0 {
        return Err(ImageError::InvalidKernelSize(diameter));
    }

    if sigma_color.is_nan() || sigma_color <= 0.0 {
        return Err(ImageError::InvalidParameter(
            "sigma_color",
            sigma_color as f64,
        ));
    }

    if sigma_space.is_nan() || sigma_space <= 0.0 {
        return Err(ImageError::InvalidParameter(
            "sigma_space",
            sigma_space as f64,
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

    let radius = (diameter / 2) as isize;
    let gauss_color_coeff = -0.5 / (sigma_color * sigma_color);
    let gauss_space_coeff = -0.5 / (sigma_space * sigma_space);

    // spatial offsets and weights inside the circular window
    let mut space_offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist = ((dy * dy + dx * dx) as f32).sqrt();
            if dist > radius as f32 {
                continue;
            }
            space_offsets.push((dy, dx, (dist * dist * gauss_space_coeff).exp()));
        }
    }

    let max_color_dist = 255 * C;
    let color_weight: Vec<f32> = (0..=max_color_dist)
        .map(|d| ((d * d) as f32 * gauss_color_coeff).exp())
        .collect();

    let (rows, cols) = (src.rows(), src.cols());
    let border = BorderMode::Reflect101;
    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();

    for r in 0..rows {
        for c in 0..cols {
            let center_idx = (r * cols + c) * C;
            let center = &src_data[center_idx..center_idx + C];

            let mut sum = [0.0f32; C];
            let mut wsum = 0.0f32;
            for &(dy, dx, space_w) in &space_offsets {
                let y = border.fold(r as isize + dy, rows);
                let x = border.fold(c as isize + dx, cols);
                let idx = (y * cols + x) * C;
                let pixel = &src_data[idx..idx + C];

                let color_dist: usize = pixel
                    .iter()
                    .zip(center)
                    .map(|(&p, &q)| (p as i32 - q as i32).unsigned_abs() as usize)
                    .sum();
                let w = space_w * color_weight[color_dist];

                for (s, &p) in sum.iter_mut().zip(pixel) {
                    *s += p as f32 * w;
                }
                wsum += w;
            }

            for (ch, s) in sum.iter().enumerate() {
                dst_data[center_idx + ch] = (s / wsum).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use medproc_image::{Image, ImageError, ImageSize};

    #[test]
    fn bilateral_flat_is_identity() -> Result<(), ImageError> {
        let img = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            123,
        )?;
        let mut dst = Image::<u8, 3>::from_size_val(img.size(), 0)?;
        super::bilateral_filter(&img, &mut dst, 5, 75.0, 75.0)?;
        assert_eq!(dst.as_slice(), img.as_slice());
        Ok(())
    }

    #[test]
    fn bilateral_keeps_strong_edge() -> Result<(), ImageError> {
        // a step of 255 has a color weight of exp(-255^2 / (2 * 10^2)) ~ 0
        #[rustfmt::skip]
        let img = Image::<u8, 1>::new(
            ImageSize { width: 4, height: 2 },
            vec![
                0, 0, 255, 255,
                0, 0, 255, 255,
            ],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(img.size(), 0)?;
        super::bilateral_filter(&img, &mut dst, 3, 10.0, 75.0)?;
        assert_eq!(dst.as_slice(), img.as_slice());
        Ok(())
    }

    #[test]
    fn bilateral_smooths_small_noise() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let img = Image::<u8, 1>::new(
            ImageSize { width: 3, height: 3 },
            vec![
                100, 100, 100,
                100, 110, 100,
                100, 100, 100,
            ],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(img.size(), 0)?;
        super::bilateral_filter(&img, &mut dst, 3, 75.0, 75.0)?;
        let center = *dst.get_pixel(1, 1, 0)?;
        assert!(center > 100 && center < 110);
        Ok(())
    }

    #[test]
    fn bilateral_diameter_one_is_identity() -> Result<(), ImageError> {
        let img = Image::<u8, 1>::new([3, 1].into(), vec![0, 200, 40])?;
        let mut dst = Image::<u8, 1>::from_size_val(img.size(), 0)?;
        super::bilateral_filter(&img, &mut dst, 1, 75.0, 75.0)?;
        assert_eq!(dst.as_slice(), img.as_slice());
        Ok(())
    }
}
