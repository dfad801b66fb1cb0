use medproc_image::{Image, ImageDtype, ImageError};

use crate::border::BorderMode;

/// A separable 2D filter that applies horizontal and vertical 1D convolutions sequentially.
///
/// This struct caches the kernel data and precomputed offsets for efficient filtering.
struct SeparableFilter<'a> {
    kernel_x: &'a [f32],
    kernel_y: &'a [f32],
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
}

impl<'a> SeparableFilter<'a> {
    fn new(kernel_x: &'a [f32], kernel_y: &'a [f32]) -> Self {
        let half_x = kernel_x.len() / 2;
        let half_y = kernel_y.len() / 2;

        let offsets_x = (0..kernel_x.len())
            .map(|i| i as isize - half_x as isize)
            .collect();

        let offsets_y = (0..kernel_y.len())
            .map(|i| i as isize - half_y as isize)
            .collect();

        Self {
            kernel_x,
            kernel_y,
            offsets_x,
            offsets_y,
        }
    }

    /// Horizontal pass into a float buffer, then vertical pass into `dst`.
    fn apply<T, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<T, C>,
        border: BorderMode,
    ) where
        T: ImageDtype,
    {
        let rows = src.rows();
        let cols = src.cols();
        let src_data = src.as_slice();
        let mut temp = vec![0.0f32; src_data.len()];

        // horizontal
        for r in 0..rows {
            let row_offset = r * cols * C;
            for c in 0..cols {
                let mut acc = [0.0f32; C];
                for (&k, &off) in self.kernel_x.iter().zip(self.offsets_x.iter()) {
                    let x = border.fold(c as isize + off, cols);
                    let idx = row_offset + x * C;
                    for (ch, acc_val) in acc.iter_mut().enumerate() {
                        let v: f32 = src_data[idx + ch].into();
                        *acc_val += v * k;
                    }
                }
                temp[row_offset + c * C..row_offset + (c + 1) * C].copy_from_slice(&acc);
            }
        }

        // vertical
        let dst_data = dst.as_slice_mut();
        for r in 0..rows {
            let row_offset = r * cols * C;
            for c in 0..cols {
                let mut acc = [0.0f32; C];
                for (&k, &off) in self.kernel_y.iter().zip(self.offsets_y.iter()) {
                    let y = border.fold(r as isize + off, rows);
                    let idx = y * cols * C + c * C;
                    for (ch, acc_val) in acc.iter_mut().enumerate() {
                        *acc_val += temp[idx + ch] * k;
                    }
                }

                let out_idx = row_offset + c * C;
                for (ch, &acc_val) in acc.iter().enumerate() {
                    dst_data[out_idx + ch] = T::from_f32(acc_val);
                }
            }
        }
    }
}

/// Apply a separable filter to an image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `border` - How samples outside the image are read.
///
/// Integer outputs are rounded and saturated.
pub fn separable_filter<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
    border: BorderMode,
) -> Result<(), ImageError>
where
    T: ImageDtype,
{
    if kernel_x.is_empty() || kernel_y.is_empty() {
        return Err(ImageError::InvalidKernelLength(0, 1));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    SeparableFilter::new(kernel_x, kernel_y).apply(src, dst, border);

    Ok(())
}
