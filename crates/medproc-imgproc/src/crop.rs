use medproc_image::{Image, ImageError, Region};

/// Crop an image to a specified region.
///
/// The size of the region is given by `dst`.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// Returns an error if the region does not fit in the source image.
///
/// # Examples
///
/// ```rust
/// use medproc_image::{Image, ImageSize};
/// use medproc_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T: Copy, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError> {
    if x + dst.cols() > src.cols() || y + dst.rows() > src.rows() {
        return Err(ImageError::InvalidRegion {
            x: x as i64,
            y: y as i64,
            width: dst.cols() as i64,
            height: dst.rows() as i64,
            image_width: src.cols(),
            image_height: src.rows(),
        });
    }

    let dst_cols = dst.cols();
    let src_cols = src.cols();

    for (i, dst_row) in dst.as_slice_mut().chunks_exact_mut(dst_cols * C).enumerate() {
        // get the slice at the top left corner
        let offset = ((y + i) * src_cols + x) * C;
        dst_row.copy_from_slice(&src.as_slice()[offset..offset + dst_cols * C]);
    }

    Ok(())
}

/// Copy the pixels of a region into a new image.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `region` - The rectangle to copy, validated against the source extent.
///
/// # Returns
///
/// An image with the size of the region.
pub fn crop_region<T: Copy + Default, const C: usize>(
    src: &Image<T, C>,
    region: &Region,
) -> Result<Image<T, C>, ImageError> {
    let (x, y, width, height) = region.validate(src.size())?;
    let mut dst = Image::from_size_val([width, height].into(), T::default())?;
    crop_image(src, &mut dst, x, y)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use medproc_image::{Image, ImageError, ImageSize, Region};

    #[test]
    fn test_crop() -> Result<(), ImageError> {
        let image_size = ImageSize {
            width: 2,
            height: 3,
        };

        #[rustfmt::skip]
        let image = Image::<_, 3>::new(
            image_size,
            vec![
                0u8, 1, 2, 3, 4, 5,
                6u8, 7, 8, 9, 10, 11,
                12u8, 13, 14, 15, 16, 17,
            ],
        )?;

        let mut crop = Image::<_, 3>::from_size_val([1, 2].into(), 0u8)?;
        super::crop_image(&image, &mut crop, 1, 1)?;
        assert_eq!(crop.as_slice(), &[9u8, 10, 11, 15, 16, 17]);

        assert!(super::crop_image(&image, &mut crop, 2, 0).is_err());

        Ok(())
    }

    #[test]
    fn test_crop_region() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([4, 3].into(), (0..12).collect())?;

        let crop = super::crop_region(&image, &Region::new(1, 1, 3, 2))?;
        assert_eq!(
            crop.size(),
            ImageSize {
                width: 3,
                height: 2
            }
        );
        assert_eq!(crop.as_slice(), &[5, 6, 7, 9, 10, 11]);

        assert!(super::crop_region(&image, &Region::new(0, 0, 0, 2)).is_err());
        assert!(super::crop_region(&image, &Region::new(2, 0, 3, 1)).is_err());
        Ok(())
    }
}
