use medproc_image::{Image, ImageError, PixelBuffer};
use medproc_imgproc::{
    color::{from_luma, to_luma},
    connected_components::connected_components,
    distance_transform::distance_transform,
    morphology::{dilate, open, Kernel},
    threshold::{adaptive_threshold_mean, threshold_binary, threshold_binary_inverse, threshold_otsu},
    watershed::{watershed, WATERSHED_BOUNDARY},
};

use crate::params::SegmentationMode;

/// Color of the watershed boundaries on three channel buffers.
pub const WATERSHED_COLOR: [u8; 3] = [255, 0, 0];

/// Local mean window and offset of the adaptive threshold.
const ADAPTIVE_BLOCK_SIZE: usize = 11;
const ADAPTIVE_C: i32 = 2;

/// Fraction of the maximum distance above which a pixel is a sure foreground seed.
const SURE_FOREGROUND_RATIO: f32 = 0.7;

/// Segment the buffer with the method selected by `mode`.
///
/// Thresholding modes work on the luma and broadcast the binary mask back to
/// the channel count of `src`. The watershed paints the basin boundaries over
/// the input, with [`WATERSHED_COLOR`] on three channel buffers and 255 on
/// single channel ones.
///
/// # Arguments
///
/// * `src` - The input buffer.
/// * `mode` - The segmentation method.
/// * `threshold` - The global threshold, ignored by the adaptive and Otsu methods.
pub fn segment(
    src: &PixelBuffer,
    mode: SegmentationMode,
    threshold: u8,
) -> Result<PixelBuffer, ImageError> {
    log::debug!("segmentation stage: {mode:?}, threshold {threshold}");

    let binary = match mode {
        SegmentationMode::None => return Ok(src.clone()),
        SegmentationMode::Threshold => binarize(src, |luma, dst| {
            threshold_binary(luma, dst, threshold, 255)
        })?,
        SegmentationMode::AdaptiveThreshold => binarize(src, |luma, dst| {
            adaptive_threshold_mean(luma, dst, 255, ADAPTIVE_BLOCK_SIZE, ADAPTIVE_C)
        })?,
        SegmentationMode::Otsu => binarize(src, |luma, dst| {
            threshold_otsu(luma, dst, 255).map(|_| ())
        })?,
        SegmentationMode::Watershed => {
            let mut markers = watershed_markers(&to_luma(src)?, threshold)?;
            return paint_watershed(src, &mut markers);
        }
    };

    from_luma(&binary, src.channels())
}

/// Run a binarization on the luma of a buffer.
fn binarize(
    src: &PixelBuffer,
    op: impl FnOnce(&Image<u8, 1>, &mut Image<u8, 1>) -> Result<(), ImageError>,
) -> Result<Image<u8, 1>, ImageError> {
    let luma = to_luma(src)?;
    let mut binary = Image::from_size_val(luma.size(), 0u8)?;
    op(&luma, &mut binary)?;
    Ok(binary)
}

/// Build the seed map of the watershed from the luma of a buffer.
///
/// 1. binarize with inverted polarity at `threshold`
/// 2. open twice with a 3x3 box to remove noise
/// 3. dilate the opening three times, the rest is sure background
/// 4. pixels farther than 70% of the maximum distance to the background are sure foreground
/// 5. label the sure foreground components from 2, the sure background gets 1
///    and the pixels in between are unknown (0)
///
/// # Returns
///
/// The marker map expected by [`watershed`].
pub fn watershed_markers(luma: &Image<u8, 1>, threshold: u8) -> Result<Image<i32, 1>, ImageError> {
    let size = luma.size();
    let kernel = Kernel::box_kernel(3)?;

    let mut binary = Image::from_size_val(size, 0u8)?;
    threshold_binary_inverse(luma, &mut binary, threshold, 255)?;

    let mut opening = Image::from_size_val(size, 0u8)?;
    open(&binary, &mut opening, &kernel, 2)?;

    let mut sure_bg = Image::from_size_val(size, 0u8)?;
    dilate(&opening, &mut sure_bg, &kernel, 3)?;

    let mut distance = Image::from_size_val(size, 0.0f32)?;
    distance_transform(&opening, &mut distance)?;
    let max_distance = distance.as_slice().iter().copied().fold(0.0f32, f32::max);
    let limit = SURE_FOREGROUND_RATIO * max_distance;
    let sure_fg = distance.map(|d| if d > limit { 255u8 } else { 0 });

    let mut labels = Image::from_size_val(size, 0u32)?;
    let num_seeds = connected_components(&sure_fg, &mut labels)?;
    log::trace!("watershed: {num_seeds} seeds, max distance {max_distance}");

    let data = labels
        .as_slice()
        .iter()
        .zip(sure_bg.as_slice())
        .zip(sure_fg.as_slice())
        .map(|((&label, &bg), &fg)| {
            if bg.saturating_sub(fg) == 255 {
                0
            } else {
                label as i32 + 1
            }
        })
        .collect();

    Image::new(size, data)
}

fn paint_watershed(src: &PixelBuffer, markers: &mut Image<i32, 1>) -> Result<PixelBuffer, ImageError> {
    match src {
        PixelBuffer::Gray(img) => {
            watershed(img, markers)?;
            let mut out = img.clone();
            for (pixel, &m) in out.as_slice_mut().iter_mut().zip(markers.as_slice()) {
                if m == WATERSHED_BOUNDARY {
                    *pixel = 255;
                }
            }
            Ok(PixelBuffer::Gray(out))
        }
        PixelBuffer::Rgb(img) => {
            watershed(img, markers)?;
            let mut out = img.clone();
            for (pixel, &m) in out.as_slice_mut().chunks_exact_mut(3).zip(markers.as_slice()) {
                if m == WATERSHED_BOUNDARY {
                    pixel.copy_from_slice(&WATERSHED_COLOR);
                }
            }
            Ok(PixelBuffer::Rgb(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use medproc_image::{ImageError, PixelBuffer};

    use super::{segment, watershed_markers, WATERSHED_COLOR};
    use crate::params::SegmentationMode;

    fn checkerboard() -> Result<PixelBuffer, ImageError> {
        let data = (0..64)
            .map(|i| if (i % 8 + i / 8) % 2 == 0 { 0 } else { 255 })
            .collect();
        PixelBuffer::new(8, 8, 1, data)
    }

    // two dark squares on a bright background
    fn two_blobs(channels: usize) -> Result<PixelBuffer, ImageError> {
        let (width, height) = (32, 18);
        let mut data = Vec::with_capacity(width * height * channels);
        for y in 0..height {
            for x in 0..width {
                let inside =
                    (5..13).contains(&y) && ((5..12).contains(&x) || (18..25).contains(&x));
                let v = if inside { 20 } else { 200 };
                data.extend(std::iter::repeat(v).take(channels));
            }
        }
        PixelBuffer::new(width, height, channels, data)
    }

    #[test]
    fn threshold_is_strict() -> Result<(), ImageError> {
        let src = PixelBuffer::new(3, 1, 1, vec![127, 128, 10])?;
        let out = segment(&src, SegmentationMode::Threshold, 127)?;
        assert_eq!(out.as_slice(), &[0, 255, 0]);
        Ok(())
    }

    #[test]
    fn otsu_reproduces_checkerboard() -> Result<(), ImageError> {
        let src = checkerboard()?;
        let out = segment(&src, SegmentationMode::Otsu, 200)?;
        assert_eq!(out, src);
        Ok(())
    }

    #[test]
    fn threshold_broadcasts_to_rgb() -> Result<(), ImageError> {
        let src = PixelBuffer::new(2, 1, 3, vec![250, 250, 250, 5, 5, 5])?;
        let out = segment(&src, SegmentationMode::Threshold, 100)?;
        assert_eq!(out.channels(), 3);
        assert_eq!(out.as_slice(), &[255, 255, 255, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn watershed_markers_partition() -> Result<(), ImageError> {
        let src = two_blobs(1)?;
        let PixelBuffer::Gray(luma) = &src else {
            unreachable!()
        };
        let markers = watershed_markers(luma, 127)?;
        let max = markers.as_slice().iter().copied().max().unwrap_or(0);
        // background and one seed per square
        assert_eq!(max, 3);
        assert_eq!(*markers.get_pixel(0, 0, 0)?, 1);
        assert!(markers.as_slice().contains(&0));
        Ok(())
    }

    #[test]
    fn watershed_paints_boundaries_gray() -> Result<(), ImageError> {
        let src = two_blobs(1)?;
        let out = segment(&src, SegmentationMode::Watershed, 127)?;
        assert_eq!(out.channels(), 1);

        let frame = 2 * 32 + 2 * 16;
        let painted = out.as_slice().iter().filter(|&&v| v == 255).count();
        assert!(painted > frame);
        for (&o, &i) in out.as_slice().iter().zip(src.as_slice()) {
            assert!(o == 255 || o == i);
        }
        Ok(())
    }

    #[test]
    fn watershed_paints_boundaries_red() -> Result<(), ImageError> {
        let src = two_blobs(3)?;
        let out = segment(&src, SegmentationMode::Watershed, 127)?;
        assert_eq!(out.channels(), 3);
        assert_eq!(&out.as_slice()[..3], &WATERSHED_COLOR);
        for (o, i) in out.as_slice().chunks_exact(3).zip(src.as_slice().chunks_exact(3)) {
            assert!(o == WATERSHED_COLOR || o == i);
        }
        Ok(())
    }
}
