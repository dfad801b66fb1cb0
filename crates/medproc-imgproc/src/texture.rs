use medproc_image::Image;

/// Number of gray levels of an 8-bit image.
pub const GLCM_LEVELS: usize = 256;

/// Pixel pair offsets `(dr, dc)` at distance 1 for the angles 0°, 45°, 90° and 135°.
pub const GLCM_OFFSETS: [(isize, isize); 4] = [(0, 1), (1, 1), (1, 0), (1, -1)];

/// A symmetric and normalized gray level co-occurrence matrix.
///
/// `p(i, j)` is the frequency of the pixel pairs `(src[r, c], src[r + dr, c + dc])`
/// equal to `(i, j)` or `(j, i)`.
#[derive(Debug, Clone)]
pub struct Glcm {
    data: Vec<f64>,
}

impl Glcm {
    /// Build the co-occurrence matrix of an 8-bit image for one offset.
    ///
    /// Pairs leaving the image are skipped. A matrix with no pair at all, for
    /// an image smaller than the offset, stays zero.
    ///
    /// # Arguments
    ///
    /// * `src` - The grayscale input image.
    /// * `offset` - The `(dr, dc)` offset between the two pixels of a pair.
    pub fn new(src: &Image<u8, 1>, offset: (isize, isize)) -> Self {
        let (rows, cols) = (src.rows() as isize, src.cols() as isize);
        let (dr, dc) = offset;
        let data = src.as_slice();

        let mut counts = vec![0u64; GLCM_LEVELS * GLCM_LEVELS];
        for r in 0..rows {
            let r2 = r + dr;
            if r2 < 0 || r2 >= rows {
                continue;
            }
            for c in 0..cols {
                let c2 = c + dc;
                if c2 < 0 || c2 >= cols {
                    continue;
                }
                let i = data[(r * cols + c) as usize] as usize;
                let j = data[(r2 * cols + c2) as usize] as usize;
                counts[i * GLCM_LEVELS + j] += 1;
                counts[j * GLCM_LEVELS + i] += 1;
            }
        }

        let total: u64 = counts.iter().sum();
        let data = if total == 0 {
            vec![0.0; counts.len()]
        } else {
            counts.iter().map(|&n| n as f64 / total as f64).collect()
        };

        Self { data }
    }

    /// The frequency of the pair `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * GLCM_LEVELS + j]
    }

    fn weighted_sum(&self, weight: impl Fn(f64, f64) -> f64) -> f64 {
        self.data
            .chunks_exact(GLCM_LEVELS)
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, &p)| p != 0.0)
                    .map(|(j, &p)| p * weight(i as f64, j as f64))
                    .sum::<f64>()
            })
            .sum()
    }

    /// Sum of `p(i, j) * (i - j)^2`.
    pub fn contrast(&self) -> f64 {
        self.weighted_sum(|i, j| (i - j) * (i - j))
    }

    /// Sum of `p(i, j) * |i - j|`.
    pub fn dissimilarity(&self) -> f64 {
        self.weighted_sum(|i, j| (i - j).abs())
    }

    /// Sum of `p(i, j) / (1 + (i - j)^2)`.
    pub fn homogeneity(&self) -> f64 {
        self.weighted_sum(|i, j| 1.0 / (1.0 + (i - j) * (i - j)))
    }

    /// Square root of the angular second moment.
    pub fn energy(&self) -> f64 {
        self.data.iter().map(|p| p * p).sum::<f64>().sqrt()
    }

    /// Linear dependency of the gray levels of the pixel pairs.
    ///
    /// Returns 1 when either marginal standard deviation vanishes.
    pub fn correlation(&self) -> f64 {
        let mean_i = self.weighted_sum(|i, _| i);
        let mean_j = self.weighted_sum(|_, j| j);
        let std_i = self.weighted_sum(|i, _| (i - mean_i) * (i - mean_i)).sqrt();
        let std_j = self.weighted_sum(|_, j| (j - mean_j) * (j - mean_j)).sqrt();

        if std_i < 1e-15 || std_j < 1e-15 {
            return 1.0;
        }

        self.weighted_sum(|i, j| (i - mean_i) * (j - mean_j)) / (std_i * std_j)
    }
}

/// Texture descriptors of an image, averaged over the [`GLCM_OFFSETS`] angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureProperties {
    /// Local intensity variation.
    pub contrast: f64,
    /// Mean absolute gray level difference.
    pub dissimilarity: f64,
    /// Closeness of the pairs to the matrix diagonal.
    pub homogeneity: f64,
    /// Uniformity of the pair distribution.
    pub energy: f64,
    /// Linear dependency of the gray levels.
    pub correlation: f64,
}

/// Compute the co-occurrence texture descriptors of a grayscale image.
///
/// One matrix is built per angle of [`GLCM_OFFSETS`] and the properties are
/// averaged over the four angles.
///
/// # Arguments
///
/// * `src` - The grayscale input image.
///
/// # Example
///
/// ```
/// use medproc_image::{Image, ImageSize};
/// use medproc_imgproc::texture::texture_properties;
///
/// let image = Image::<u8, 1>::from_size_val(ImageSize { width: 4, height: 4 }, 9).unwrap();
/// let props = texture_properties(&image);
/// assert_eq!(props.contrast, 0.0);
/// assert_eq!(props.energy, 1.0);
/// ```
pub fn texture_properties(src: &Image<u8, 1>) -> TextureProperties {
    let mut props = TextureProperties {
        contrast: 0.0,
        dissimilarity: 0.0,
        homogeneity: 0.0,
        energy: 0.0,
        correlation: 0.0,
    };

    for offset in GLCM_OFFSETS {
        let glcm = Glcm::new(src, offset);
        props.contrast += glcm.contrast();
        props.dissimilarity += glcm.dissimilarity();
        props.homogeneity += glcm.homogeneity();
        props.energy += glcm.energy();
        props.correlation += glcm.correlation();
    }

    let n = GLCM_OFFSETS.len() as f64;
    props.contrast /= n;
    props.dissimilarity /= n;
    props.homogeneity /= n;
    props.energy /= n;
    props.correlation /= n;

    log::trace!("texture properties {props:?}");

    props
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use medproc_image::{Image, ImageError, ImageSize};

    use super::{texture_properties, Glcm};

    #[test]
    fn glcm_counts_are_symmetric() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize { width: 4, height: 4 },
            vec![
                0, 0, 1, 1,
                0, 0, 1, 1,
                0, 2, 2, 2,
                2, 2, 3, 3,
            ],
        )?;

        let glcm = Glcm::new(&image, (0, 1));
        // 12 pairs counted both ways
        assert_relative_eq!(glcm.get(0, 0), 4.0 / 24.0);
        assert_relative_eq!(glcm.get(0, 1), 2.0 / 24.0);
        assert_relative_eq!(glcm.get(1, 0), 2.0 / 24.0);
        assert_relative_eq!(glcm.get(2, 2), 6.0 / 24.0);
        assert_relative_eq!(glcm.get(2, 3), 1.0 / 24.0);
        Ok(())
    }

    #[test]
    fn texture_of_flat_image() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([5, 5].into(), 120)?;
        let props = texture_properties(&image);
        assert_relative_eq!(props.contrast, 0.0);
        assert_relative_eq!(props.dissimilarity, 0.0);
        assert_relative_eq!(props.homogeneity, 1.0);
        assert_relative_eq!(props.energy, 1.0);
        assert_relative_eq!(props.correlation, 1.0);
        Ok(())
    }

    #[test]
    fn texture_of_vertical_stripes() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let data = (0..size.area()).map(|i| (i % 2) as u8).collect();
        let image = Image::<u8, 1>::new(size, data)?;

        let props = texture_properties(&image);
        // every angle but 90° only pairs different columns
        assert_relative_eq!(props.contrast, 0.75, epsilon = 1e-12);
        assert_relative_eq!(props.dissimilarity, 0.75, epsilon = 1e-12);
        assert_relative_eq!(props.homogeneity, 0.625, epsilon = 1e-12);
        assert_relative_eq!(props.energy, 0.5f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(props.correlation, -0.5, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn texture_of_single_pixel() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([1, 1].into(), 3)?;
        let props = texture_properties(&image);
        assert_relative_eq!(props.contrast, 0.0);
        assert_relative_eq!(props.energy, 0.0);
        assert_relative_eq!(props.correlation, 1.0);
        Ok(())
    }
}
