use medproc_image::{map_buffer, Image, ImageError, PixelBuffer};
use medproc_imgproc::{
    clahe::clahe,
    enhance::{clahe_rgb, contrast_stretch, equalize_histogram_rgb, unsharp_mask},
    histogram::equalize_histogram,
};

use crate::params::EnhancementMode;

const CLAHE_CLIP_LIMIT: f32 = 2.0;
const CLAHE_TILES: usize = 8;

/// Enhance the contrast of the buffer with the method selected by `mode`.
///
/// Equalization and CLAHE only touch the luma of three channel buffers,
/// through a YUV and a CIE Lab round trip respectively.
pub fn enhance(src: &PixelBuffer, mode: EnhancementMode) -> Result<PixelBuffer, ImageError> {
    log::debug!("enhancement stage: {mode:?}");

    let out = match (mode, src) {
        (EnhancementMode::None, _) => src.clone(),
        (EnhancementMode::HistEqualize, PixelBuffer::Gray(img)) => {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            equalize_histogram(img, &mut dst)?;
            PixelBuffer::Gray(dst)
        }
        (EnhancementMode::HistEqualize, PixelBuffer::Rgb(img)) => {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            equalize_histogram_rgb(img, &mut dst)?;
            PixelBuffer::Rgb(dst)
        }
        (EnhancementMode::Clahe, PixelBuffer::Gray(img)) => {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            clahe(img, &mut dst, CLAHE_CLIP_LIMIT, CLAHE_TILES, CLAHE_TILES)?;
            PixelBuffer::Gray(dst)
        }
        (EnhancementMode::Clahe, PixelBuffer::Rgb(img)) => {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            clahe_rgb(img, &mut dst, CLAHE_CLIP_LIMIT, CLAHE_TILES, CLAHE_TILES)?;
            PixelBuffer::Rgb(dst)
        }
        (EnhancementMode::ContrastStretch, _) => map_buffer!(src, |img| {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            contrast_stretch(img, &mut dst)?;
            dst
        }),
        (EnhancementMode::Sharpen, _) => map_buffer!(src, |img| {
            let mut dst = Image::from_size_val(img.size(), 0)?;
            unsharp_mask(img, &mut dst)?;
            dst
        }),
    };

    Ok(out)
}

#[cfg(test)]
mod tests {
    use medproc_image::{ImageError, PixelBuffer};

    use super::enhance;
    use crate::params::EnhancementMode;

    #[test]
    fn stretch_flat_channel_is_unchanged() -> Result<(), ImageError> {
        let src = PixelBuffer::new(4, 4, 1, vec![100; 16])?;
        let out = enhance(&src, EnhancementMode::ContrastStretch)?;
        assert_eq!(out, src);
        Ok(())
    }

    #[test]
    fn stretch_rgb_keeps_flat_channel() -> Result<(), ImageError> {
        let src = PixelBuffer::new(2, 1, 3, vec![10, 40, 0, 30, 40, 255])?;
        let out = enhance(&src, EnhancementMode::ContrastStretch)?;
        assert_eq!(out.as_slice(), &[0, 40, 0, 255, 40, 255]);
        Ok(())
    }

    #[test]
    fn every_mode_keeps_shape() -> Result<(), ImageError> {
        for channels in [1, 3] {
            let data = (0..20 * 12 * channels).map(|i| (i % 97) as u8 + 40).collect();
            let src = PixelBuffer::new(20, 12, channels, data)?;
            for mode in [
                EnhancementMode::HistEqualize,
                EnhancementMode::Clahe,
                EnhancementMode::ContrastStretch,
                EnhancementMode::Sharpen,
            ] {
                let out = enhance(&src, mode)?;
                assert_eq!(out.size(), src.size());
                assert_eq!(out.channels(), channels);
            }
        }
        Ok(())
    }

    #[test]
    fn equalize_gray_spreads_range() -> Result<(), ImageError> {
        let src = PixelBuffer::new(4, 1, 1, vec![50, 50, 100, 150])?;
        let out = enhance(&src, EnhancementMode::HistEqualize)?;
        assert_eq!(out.as_slice(), &[0, 0, 128, 255]);
        Ok(())
    }
}
