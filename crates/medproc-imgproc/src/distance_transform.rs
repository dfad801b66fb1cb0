use medproc_image::{Image, ImageError};

/// Squared distance assigned to pixels with no zero pixel in reach.
const INF: f64 = 1e20;

/// Lower envelope of parabolas rooted at `(q, f[q])`, written into `d`.
fn distance_transform_1d(f: &[f64], d: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    let mut k = 0usize;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;

    let intersection = |q: usize, p: usize| -> f64 {
        let (qf, pf) = (q as f64, p as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf)
    };

    for q in 1..n {
        // z[0] is -inf so k never goes below zero
        let mut s = intersection(q, v[k]);
        while s <= z[k] {
            k -= 1;
            s = intersection(q, v[k]);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, dq) in d.iter_mut().enumerate() {
        let qf = q as f64;
        while z[k + 1] < qf {
            k += 1;
        }
        let diff = qf - v[k] as f64;
        *dq = diff * diff + f[v[k]];
    }
}

/// Compute the exact euclidean distance from every pixel to the nearest zero pixel.
///
/// Zero pixels get a distance of 0. When the image has no zero pixel every
/// distance equals the same large finite value.
///
/// # Arguments
///
/// * `src` - The input image, pixels equal to zero are the sites.
/// * `dst` - The output distance map.
pub fn distance_transform(src: &Image<u8, 1>, dst: &mut Image<f32, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    let n = rows.max(cols);

    let mut grid: Vec<f64> = src
        .as_slice()
        .iter()
        .map(|&p| if p == 0 { 0.0 } else { INF })
        .collect();

    let mut f = vec![0.0f64; n];
    let mut d = vec![0.0f64; n];
    let mut v = vec![0usize; n];
    let mut z = vec![0.0f64; n + 1];

    // columns
    for c in 0..cols {
        for r in 0..rows {
            f[r] = grid[r * cols + c];
        }
        distance_transform_1d(&f[..rows], &mut d[..rows], &mut v, &mut z);
        for r in 0..rows {
            grid[r * cols + c] = d[r];
        }
    }

    // rows
    for r in 0..rows {
        let row = &mut grid[r * cols..(r + 1) * cols];
        f[..cols].copy_from_slice(row);
        distance_transform_1d(&f[..cols], &mut d[..cols], &mut v, &mut z);
        row.copy_from_slice(&d[..cols]);
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(&grid)
        .for_each(|(out, &sq)| *out = sq.sqrt() as f32);

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use medproc_image::{Image, ImageError, ImageSize};

    fn brute_force(src: &Image<u8, 1>) -> Vec<f32> {
        let (rows, cols) = (src.rows(), src.cols());
        let mut out = vec![f32::MAX; rows * cols];
        for y in 0..rows {
            for x in 0..cols {
                for j in 0..rows {
                    for i in 0..cols {
                        if src.as_slice()[j * cols + i] == 0 {
                            let dx = x as f32 - i as f32;
                            let dy = y as f32 - j as f32;
                            out[y * cols + x] = out[y * cols + x].min((dx * dx + dy * dy).sqrt());
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn distance_transform_square() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(
            ImageSize { width: 5, height: 5 },
            vec![
                0, 0, 0, 0, 0,
                0, 1, 1, 1, 0,
                0, 1, 1, 1, 0,
                0, 1, 1, 1, 0,
                0, 0, 0, 0, 0,
            ],
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        super::distance_transform(&src, &mut dst)?;

        assert_relative_eq!(*dst.get_pixel(0, 0, 0)?, 0.0);
        assert_relative_eq!(*dst.get_pixel(1, 1, 0)?, 1.0);
        assert_relative_eq!(*dst.get_pixel(2, 2, 0)?, 2.0);
        Ok(())
    }

    #[test]
    fn distance_transform_matches_brute_force() -> Result<(), ImageError> {
        use rand::Rng;
        let mut rng = rand::rng();
        let size = ImageSize {
            width: 13,
            height: 9,
        };
        let data = (0..size.area())
            .map(|_| if rng.random_bool(0.15) { 0 } else { 255 })
            .collect::<Vec<u8>>();
        let mut src = Image::<u8, 1>::new(size, data)?;
        src.set_pixel(6, 4, 0, 0)?;

        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        super::distance_transform(&src, &mut dst)?;

        for (a, b) in dst.as_slice().iter().zip(brute_force(&src)) {
            assert_relative_eq!(*a, b, epsilon = 1e-4);
        }
        Ok(())
    }

    #[test]
    fn distance_transform_no_sites() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([4, 3].into(), 255)?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        super::distance_transform(&src, &mut dst)?;
        let first = dst.as_slice()[0];
        assert!(first.is_finite() && first > 1e6);
        assert!(dst.as_slice().iter().all(|&v| v == first));
        Ok(())
    }
}
