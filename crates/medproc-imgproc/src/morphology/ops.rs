use medproc_image::{Image, ImageError};

use super::kernels::Kernel;

#[derive(Clone, Copy)]
enum Extremum {
    Min,
    Max,
}

/// One pass of a rank filter over the active kernel cells.
///
/// Cells falling outside the image are skipped, so the border never wins the comparison.
fn morph_pass<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    offsets: &[(isize, isize)],
    op: Extremum,
) where
    T: Copy + Ord,
{
    let (rows, cols) = (src.rows() as isize, src.cols() as isize);
    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();

    for r in 0..rows {
        for c in 0..cols {
            let out_idx = (r * cols + c) as usize * C;
            for ch in 0..C {
                let mut acc = src_data[out_idx + ch];
                for &(dy, dx) in offsets {
                    let (y, x) = (r + dy, c + dx);
                    if y < 0 || x < 0 || y >= rows || x >= cols {
                        continue;
                    }
                    let v = src_data[(y * cols + x) as usize * C + ch];
                    acc = match op {
                        Extremum::Min => acc.min(v),
                        Extremum::Max => acc.max(v),
                    };
                }
                dst_data[out_idx + ch] = acc;
            }
        }
    }
}

fn morph<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    iterations: usize,
    op: Extremum,
) -> Result<(), ImageError>
where
    T: Copy + Ord,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let offsets = kernel.offsets();
    dst.as_slice_mut().copy_from_slice(src.as_slice());

    let mut tmp = src.clone();
    for _ in 0..iterations {
        tmp.as_slice_mut().copy_from_slice(dst.as_slice());
        morph_pass(&tmp, dst, &offsets, op);
    }

    Ok(())
}

/// Dilate an image using a [`Kernel`].
///
/// Dilation expands white regions in the image. Each pixel is replaced
/// by the maximum value in the neighborhood defined by the kernel.
/// Neighbours outside the image are ignored.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
/// * `iterations` - How many times the dilation is applied.
///
/// # Returns
///
/// Ok(()) on success, or [`ImageError`] if shapes don't match.
pub fn dilate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    iterations: usize,
) -> Result<(), ImageError>
where
    T: Copy + Ord,
{
    morph(src, dst, kernel, iterations, Extremum::Max)
}

/// Erode an image using a [`Kernel`].
///
/// Erosion shrinks white regions in the image. Each pixel is replaced
/// by the minimum value in the neighborhood defined by the kernel.
/// Neighbours outside the image are ignored.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
/// * `iterations` - How many times the erosion is applied.
///
/// # Returns
///
/// Ok(()) on success, or [`ImageError`] if shapes don't match.
pub fn erode<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    iterations: usize,
) -> Result<(), ImageError>
where
    T: Copy + Ord,
{
    morph(src, dst, kernel, iterations, Extremum::Min)
}

/// Morphological opening: `iterations` erosions followed by as many dilations.
///
/// Opening removes small bright structures.
pub fn open<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    iterations: usize,
) -> Result<(), ImageError>
where
    T: Copy + Ord,
{
    let mut eroded = src.clone();
    erode(src, &mut eroded, kernel, iterations)?;
    dilate(&eroded, dst, kernel, iterations)
}

/// Morphological closing: `iterations` dilations followed by as many erosions.
///
/// Closing fills small dark holes.
pub fn close<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    iterations: usize,
) -> Result<(), ImageError>
where
    T: Copy + Ord,
{
    let mut dilated = src.clone();
    dilate(src, &mut dilated, kernel, iterations)?;
    erode(&dilated, dst, kernel, iterations)
}
