use medproc_image::{Image, ImageError};

use crate::border::BorderMode;

const HIST_SIZE: usize = 256;

/// Contrast limited adaptive histogram equalization of a grayscale image.
///
/// The image is split into `tiles_x * tiles_y` tiles. Every tile gets its own
/// equalization table built from a histogram clipped at
/// `max(1, clip_limit * tile_area / 256)` counts, the excess being spread over
/// all bins. Output pixels interpolate bilinearly between the tables of the
/// four closest tile centers. When the image size is not a multiple of the
/// tile grid it is extended on the bottom and right by reflection for the
/// table computation.
///
/// # Arguments
///
/// * `src` - The grayscale input image.
/// * `dst` - The equalized output image.
/// * `clip_limit` - The contrast limit, relative to a uniform histogram. Non positive disables clipping.
/// * `tiles_x` - The number of tiles along the width.
/// * `tiles_y` - The number of tiles along the height.
pub fn clahe(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    clip_limit: f32,
    tiles_x: usize,
    tiles_y: usize,
) -> Result<(), ImageError> {
    if tiles_x == 0 || tiles_y == 0 {
        return Err(ImageError::InvalidKernelSize(tiles_x.min(tiles_y)));
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
    let data = src.as_slice();

    // the grid is extended whenever either side is not divisible
    let (ext_rows, ext_cols) = if rows % tiles_y == 0 && cols % tiles_x == 0 {
        (rows, cols)
    } else {
        (
            rows + tiles_y - rows % tiles_y,
            cols + tiles_x - cols % tiles_x,
        )
    };

    let tile_w = ext_cols / tiles_x;
    let tile_h = ext_rows / tiles_y;
    let tile_area = tile_w * tile_h;
    let lut_scale = (HIST_SIZE - 1) as f32 / tile_area as f32;

    let clip = if clip_limit > 0.0 {
        ((clip_limit * tile_area as f32 / HIST_SIZE as f32) as usize).max(1)
    } else {
        0
    };
    log::trace!("clahe tile {tile_w}x{tile_h}, clip limit {clip}");

    let border = BorderMode::Reflect101;
    let mut luts = vec![[0u8; HIST_SIZE]; tiles_x * tiles_y];

    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = [0usize; HIST_SIZE];
            for y in ty * tile_h..(ty + 1) * tile_h {
                let sy = border.fold(y as isize, rows);
                for x in tx * tile_w..(tx + 1) * tile_w {
                    let sx = border.fold(x as isize, cols);
                    hist[data[sy * cols + sx] as usize] += 1;
                }
            }

            if clip > 0 {
                clip_histogram(&mut hist, clip);
            }

            let lut = &mut luts[ty * tiles_x + tx];
            let mut sum = 0usize;
            for (l, &h) in lut.iter_mut().zip(hist.iter()) {
                sum += h;
                *l = (sum as f32 * lut_scale).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    let inv_tw = 1.0 / tile_w as f32;
    let inv_th = 1.0 / tile_h as f32;
    let dst_data = dst.as_slice_mut();

    for y in 0..rows {
        let tyf = y as f32 * inv_th - 0.5;
        let ty1 = tyf.floor() as isize;
        let ya = tyf - ty1 as f32;
        let ya1 = 1.0 - ya;
        let ty2 = ((ty1 + 1) as usize).min(tiles_y - 1);
        let ty1 = ty1.max(0) as usize;

        for x in 0..cols {
            let txf = x as f32 * inv_tw - 0.5;
            let tx1 = txf.floor() as isize;
            let xa = txf - tx1 as f32;
            let xa1 = 1.0 - xa;
            let tx2 = ((tx1 + 1) as usize).min(tiles_x - 1);
            let tx1 = tx1.max(0) as usize;

            let v = data[y * cols + x] as usize;
            let lut = |ty: usize, tx: usize| luts[ty * tiles_x + tx][v] as f32;

            let res = (lut(ty1, tx1) * xa1 + lut(ty1, tx2) * xa) * ya1
                + (lut(ty2, tx1) * xa1 + lut(ty2, tx2) * xa) * ya;
            dst_data[y * cols + x] = res.round().clamp(0.0, 255.0) as u8;
        }
    }

    Ok(())
}

/// Clip the histogram at `clip` and spread the excess over every bin.
fn clip_histogram(hist: &mut [usize; HIST_SIZE], clip: usize) {
    let mut clipped = 0;
    for h in hist.iter_mut() {
        if *h > clip {
            clipped += *h - clip;
            *h = clip;
        }
    }

    let redist_batch = clipped / HIST_SIZE;
    let mut residual = clipped - redist_batch * HIST_SIZE;
    for h in hist.iter_mut() {
        *h += redist_batch;
    }

    if residual != 0 {
        let residual_step = (HIST_SIZE / residual).max(1);
        let mut i = 0;
        while i < HIST_SIZE && residual > 0 {
            hist[i] += 1;
            i += residual_step;
            residual -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use medproc_image::{Image, ImageError, ImageSize};

    #[test]
    fn clip_histogram_preserves_mass() {
        let mut hist = [0usize; 256];
        hist[10] = 1000;
        hist[20] = 3;
        super::clip_histogram(&mut hist, 4);
        assert_eq!(hist.iter().sum::<usize>(), 1003);
        assert!(hist[10] <= 4 + 1000 / 256 + 1);
    }

    #[test]
    fn clahe_flat_image() -> Result<(), ImageError> {
        // 2x2 tiles clip at 1, the 3 excess counts land on bins 0, 85 and 170
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 16,
                height: 16,
            },
            128,
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::clahe(&image, &mut dst, 2.0, 8, 8)?;
        // cdf(128) = 3 of 4, 3 * 255 / 4 = 191.25
        assert!(dst.as_slice().iter().all(|&v| v == 191));
        Ok(())
    }

    #[test]
    fn clahe_increases_contrast() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 32,
            height: 32,
        };
        let data = (0..size.area())
            .map(|i| 100 + ((i % size.width) / 4) as u8)
            .collect();
        let image = Image::<u8, 1>::new(size, data)?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        super::clahe(&image, &mut dst, 2.0, 8, 8)?;

        let range = |img: &Image<u8, 1>| {
            let min = img.as_slice().iter().min().copied().unwrap_or(0);
            let max = img.as_slice().iter().max().copied().unwrap_or(0);
            max - min
        };
        assert!(range(&dst) > range(&image));
        Ok(())
    }

    #[test]
    fn clahe_not_divisible() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([10, 5].into(), (0..50).collect())?;
        let mut dst = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::clahe(&image, &mut dst, 2.0, 8, 8)?;
        assert_eq!(dst.size(), image.size());
        Ok(())
    }
}
