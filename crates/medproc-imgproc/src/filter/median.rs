use medproc_image::{Image, ImageError};

use crate::border::BorderMode;

/// Replace every sample by the median of its `kernel_size x kernel_size` window.
///
/// Channels are filtered independently and borders replicate the edge pixels.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The odd side length of the window.
///
/// # Example
///
/// ```
/// use medproc_image::{Image, ImageSize};
/// use medproc_imgproc::filter::median_blur;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![5, 200, 7]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// median_blur(&image, &mut dst, 3).unwrap();
/// assert_eq!(dst.as_slice(), &[5, 7, 7]);
/// ```
pub fn median_blur<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel_size: usize,
) -> Result<(), ImageError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
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
    let border = BorderMode::Replicate;
    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();
    let mut window = Vec::with_capacity(kernel_size * kernel_size);

    for r in 0..rows {
        for c in 0..cols {
            for ch in 0..C {
                window.clear();
                for dy in -half..=half {
                    let y = border.fold(r as isize + dy, rows);
                    for dx in -half..=half {
                        let x = border.fold(c as isize + dx, cols);
                        window.push(src_data[(y * cols + x) * C + ch]);
                    }
                }
                let mid = window.len() / 2;
                let (_, median, _) = window.select_nth_unstable(mid);
                dst_data[(r * cols + c) * C + ch] = *median;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use medproc_image::{Image, ImageError, ImageSize};

    #[test]
    fn median_removes_salt() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let img = Image::<u8, 1>::new(
            ImageSize { width: 4, height: 4 },
            vec![
                10, 10, 10, 10,
                10, 255, 10, 10,
                10, 10, 10, 0,
                10, 10, 10, 10,
            ],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(img.size(), 0)?;
        super::median_blur(&img, &mut dst, 3)?;
        assert_eq!(dst.as_slice(), &[10; 16]);
        Ok(())
    }

    #[test]
    fn median_per_channel() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let img = Image::<u8, 3>::new(
            ImageSize { width: 3, height: 1 },
            vec![
                1, 100, 7,
                9, 0, 7,
                2, 50, 7,
            ],
        )?;
        let mut dst = Image::<u8, 3>::from_size_val(img.size(), 0)?;
        super::median_blur(&img, &mut dst, 3)?;
        // the single row is replicated vertically, so each window holds each column three times
        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                1, 100, 7,
                2, 50, 7,
                2, 50, 7,
            ]
        );
        Ok(())
    }

    #[test]
    fn median_invalid_kernel() -> Result<(), ImageError> {
        let img = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut dst = img.clone();
        assert!(super::median_blur(&img, &mut dst, 4).is_err());
        Ok(())
    }
}
