use medproc_image::{with_buffer, Image, ImageError, PixelBuffer};

use crate::adjust::apply_lut;

/// Compute the pixel intensity histogram of an image.
///
/// NOTE: this is limited to 8-bit 1-channel images.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
/// * `hist` - The output histogram, counts are accumulated into it.
/// * `num_bins` - The number of bins to use for the histogram.
///
/// # Errors
///
/// Returns an error if the number of bins is invalid.
///
/// # Example
///
/// ```
/// use medproc_image::{Image, ImageSize};
/// use medproc_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 3,
///   },
///   vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
/// ).unwrap();
///
/// let mut histogram = vec![0; 3];
///
/// compute_histogram(&image, &mut histogram, 3).unwrap();
/// assert_eq!(histogram, vec![3, 3, 3]);
/// ```
pub fn compute_histogram(
    src: &Image<u8, 1>,
    hist: &mut [usize],
    num_bins: usize,
) -> Result<(), ImageError> {
    if num_bins == 0 || num_bins > 256 {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    if hist.len() != num_bins {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    let mut bin_lut = [0usize; 256];
    for (i, bin) in bin_lut.iter_mut().enumerate() {
        *bin = (i * num_bins) >> 8;
    }

    for &px in src.as_slice() {
        hist[bin_lut[px as usize]] += 1;
    }

    Ok(())
}

/// Compute the 256 bins histogram of every channel of a buffer.
///
/// # Returns
///
/// One histogram per channel, in channel order.
pub fn channel_histograms(src: &PixelBuffer) -> Result<Vec<[usize; 256]>, ImageError> {
    with_buffer!(src, |img| {
        let mut hists = Vec::with_capacity(img.num_channels());
        for channel in img.split_channels()? {
            let mut hist = [0usize; 256];
            compute_histogram(&channel, &mut hist, 256)?;
            hists.push(hist);
        }
        Ok(hists)
    })
}

/// Build the histogram equalization lookup table of a grayscale image.
///
/// lut[i] = round(255 * (cdf[i] - cdf[first]) / (N - hist[first]))
///
/// where `first` is the lowest intensity present in the image.
///
/// # Returns
///
/// `None` if the image holds a single intensity.
pub fn equalization_lut(src: &Image<u8, 1>) -> Result<Option<[u8; 256]>, ImageError> {
    let mut hist = [0usize; 256];
    compute_histogram(src, &mut hist, 256)?;

    let total = src.as_slice().len();
    let Some(first) = hist.iter().position(|&h| h > 0) else {
        return Ok(None);
    };

    if hist[first] == total {
        return Ok(None);
    }

    let scale = 255.0 / (total - hist[first]) as f32;
    let mut lut = [0u8; 256];
    let mut sum = 0usize;
    for i in first + 1..256 {
        sum += hist[i];
        lut[i] = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }

    Ok(Some(lut))
}

/// Equalize the histogram of a grayscale image.
///
/// An image with a single intensity is copied unchanged.
///
/// # Arguments
///
/// * `src` - The grayscale input image.
/// * `dst` - The equalized output image.
pub fn equalize_histogram(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    match equalization_lut(src)? {
        Some(lut) => apply_lut(src, dst, &lut),
        None => {
            dst.as_slice_mut().copy_from_slice(src.as_slice());
            Ok(())
        }
    }
}
