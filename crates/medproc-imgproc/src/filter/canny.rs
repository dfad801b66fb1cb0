use medproc_image::{Image, ImageError};

use super::kernels;
use crate::border::BorderMode;

// tan(22.5 deg) in Q15
const TG22: i32 = 13573;
const SHIFT: u32 = 15;

/// Classification of a pixel during hysteresis.
#[derive(Clone, Copy, PartialEq, Eq)]
enum EdgeState {
    NotEdge,
    Candidate,
    Edge,
}

/// Compute the 3x3 sobel derivatives of a grayscale image with replicated borders.
///
/// # Returns
///
/// The horizontal and vertical derivatives, row-major.
pub fn sobel_gradients(src: &Image<u8, 1>) -> Result<(Vec<i32>, Vec<i32>), ImageError> {
    let (deriv, smooth) = kernels::sobel_kernel_1d(3)?;
    let (rows, cols) = (src.rows(), src.cols());
    let data = src.as_slice();
    let border = BorderMode::Replicate;

    let mut gx = vec![0i32; rows * cols];
    let mut gy = vec![0i32; rows * cols];

    for r in 0..rows {
        for c in 0..cols {
            let mut sx = 0;
            let mut sy = 0;
            for (i, dy) in (-1isize..=1).enumerate() {
                let y = border.fold(r as isize + dy, rows);
                for (j, dx) in (-1isize..=1).enumerate() {
                    let x = border.fold(c as isize + dx, cols);
                    let v = data[y * cols + x] as i32;
                    sx += v * deriv[j] * smooth[i];
                    sy += v * smooth[j] * deriv[i];
                }
            }
            gx[r * cols + c] = sx;
            gy[r * cols + c] = sy;
        }
    }

    Ok((gx, gy))
}

/// Detect edges in a grayscale image with the Canny algorithm.
///
/// The gradient magnitude is the L1 norm of the sobel derivatives. Pixels that
/// are local maxima along the quantized gradient direction become candidates
/// when their magnitude exceeds `low_threshold` and edges when it exceeds
/// `high_threshold`; candidates 8-connected to an edge are promoted as well.
///
/// # Arguments
///
/// * `src` - The grayscale source image.
/// * `dst` - The binary edge map, 255 on edges and 0 elsewhere.
/// * `low_threshold` - The hysteresis lower threshold.
/// * `high_threshold` - The hysteresis upper threshold.
pub fn canny(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    low_threshold: i32,
    high_threshold: i32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (low, high) = if low_threshold > high_threshold {
        (high_threshold, low_threshold)
    } else {
        (low_threshold, high_threshold)
    };

    let (rows, cols) = (src.rows(), src.cols());
    let (gx, gy) = sobel_gradients(src)?;
    let mag: Vec<i32> = gx.iter().zip(&gy).map(|(x, y)| x.abs() + y.abs()).collect();

    // magnitudes outside the image are zero
    let mag_at = |r: isize, c: isize| -> i32 {
        if r < 0 || c < 0 || r >= rows as isize || c >= cols as isize {
            0
        } else {
            mag[r as usize * cols + c as usize]
        }
    };

    let mut state = vec![EdgeState::NotEdge; rows * cols];
    let mut stack = Vec::new();

    for r in 0..rows {
        for c in 0..cols {
            let idx = r * cols + c;
            let m = mag[idx];
            if m <= low {
                continue;
            }

            let (ri, ci) = (r as isize, c as isize);
            let xs = gx[idx];
            let ys = gy[idx];
            let x = xs.abs();
            let y = ys.abs() << SHIFT;
            let tg22x = x * TG22;

            let is_max = if y < tg22x {
                m > mag_at(ri, ci - 1) && m >= mag_at(ri, ci + 1)
            } else {
                let tg67x = tg22x + (x << (SHIFT + 1));
                if y > tg67x {
                    m > mag_at(ri - 1, ci) && m >= mag_at(ri + 1, ci)
                } else {
                    let s = if (xs ^ ys) < 0 { -1 } else { 1 };
                    m > mag_at(ri - 1, ci - s) && m > mag_at(ri + 1, ci + s)
                }
            };

            if !is_max {
                continue;
            }

            if m > high {
                state[idx] = EdgeState::Edge;
                stack.push((r, c));
            } else {
                state[idx] = EdgeState::Candidate;
            }
        }
    }

    // hysteresis
    while let Some((r, c)) = stack.pop() {
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                let (y, x) = (r as isize + dy, c as isize + dx);
                if y < 0 || x < 0 || y >= rows as isize || x >= cols as isize {
                    continue;
                }
                let idx = y as usize * cols + x as usize;
                if state[idx] == EdgeState::Candidate {
                    state[idx] = EdgeState::Edge;
                    stack.push((y as usize, x as usize));
                }
            }
        }
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(&state)
        .for_each(|(d, s)| *d = if *s == EdgeState::Edge { 255 } else { 0 });

    Ok(())
}

#[cfg(test)]
mod tests {
    use medproc_image::{Image, ImageError, ImageSize};

    #[test]
    fn sobel_vertical_step() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let img = Image::<u8, 1>::new(
            ImageSize { width: 4, height: 3 },
            vec![
                0, 0, 10, 10,
                0, 0, 10, 10,
                0, 0, 10, 10,
            ],
        )?;
        let (gx, gy) = super::sobel_gradients(&img)?;
        assert_eq!(&gx[4..8], &[0, 40, 40, 0]);
        assert!(gy.iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn canny_flat_has_no_edges() -> Result<(), ImageError> {
        let img = Image::<u8, 1>::from_size_val([8, 8].into(), 128)?;
        let mut dst = Image::<u8, 1>::from_size_val(img.size(), 0)?;
        super::canny(&img, &mut dst, 50, 150)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn canny_step_edge() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 8,
            height: 6,
        };
        let mut img = Image::<u8, 1>::from_size_val(size, 0)?;
        for y in 0..size.height {
            for x in 4..size.width {
                img.set_pixel(x, y, 0, 200)?;
            }
        }

        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        super::canny(&img, &mut dst, 50, 150)?;

        // both columns around the step share the magnitude, the left one wins the tie
        for y in 0..size.height {
            for x in 0..size.width {
                let expected = if x == 3 { 255 } else { 0 };
                assert_eq!(*dst.get_pixel(x, y, 0)?, expected, "({x}, {y})");
            }
        }
        Ok(())
    }
}
