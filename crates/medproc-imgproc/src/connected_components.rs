use medproc_image::{Image, ImageError};

use crate::union_find::DisjointSets;

/// Label the 8-connected components of the non-zero pixels of a binary image.
///
/// Background pixels get the label 0 and components are numbered from 1 in the
/// raster order of their first pixel.
///
/// # Arguments
///
/// * `src` - The binary input image, any non-zero value is foreground.
/// * `labels` - The output label map.
///
/// # Returns
///
/// The number of components found.
///
/// # Example
///
/// ```
/// use medproc_image::{Image, ImageSize};
/// use medproc_imgproc::connected_components::connected_components;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 4, height: 1 }, vec![1, 0, 1, 1]).unwrap();
/// let mut labels = Image::<u32, 1>::from_size_val(image.size(), 0).unwrap();
///
/// let count = connected_components(&image, &mut labels).unwrap();
/// assert_eq!(count, 2);
/// assert_eq!(labels.as_slice(), &[1, 0, 2, 2]);
/// ```
pub fn connected_components(
    src: &Image<u8, 1>,
    labels: &mut Image<u32, 1>,
) -> Result<u32, ImageError> {
    if src.size() != labels.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            labels.cols(),
            labels.rows(),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    let data = src.as_slice();
    let mut sets = DisjointSets::new(rows * cols);

    // merge with the already visited neighbours: west, north-west, north, north-east
    for r in 0..rows {
        for c in 0..cols {
            let idx = r * cols + c;
            if data[idx] == 0 {
                continue;
            }
            if c > 0 && data[idx - 1] != 0 {
                sets.union(idx, idx - 1);
            }
            if r > 0 {
                let up = idx - cols;
                if c > 0 && data[up - 1] != 0 {
                    sets.union(idx, up - 1);
                }
                if data[up] != 0 {
                    sets.union(idx, up);
                }
                if c + 1 < cols && data[up + 1] != 0 {
                    sets.union(idx, up + 1);
                }
            }
        }
    }

    // number the roots in raster order
    let mut root_label = vec![0u32; rows * cols];
    let mut count = 0u32;
    let out = labels.as_slice_mut();
    for idx in 0..rows * cols {
        if data[idx] == 0 {
            out[idx] = 0;
            continue;
        }
        let root = sets.find(idx);
        if root_label[root] == 0 {
            count += 1;
            root_label[root] = count;
        }
        out[idx] = root_label[root];
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use medproc_image::{Image, ImageError, ImageSize};

    #[test]
    fn components_eight_connected() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(
            ImageSize { width: 5, height: 4 },
            vec![
                0, 0, 0, 1, 0,
                1, 0, 1, 0, 0,
                1, 0, 0, 0, 1,
                0, 1, 0, 1, 1,
            ],
        )?;
        let mut labels = Image::<u32, 1>::from_size_val(src.size(), 0)?;
        let count = super::connected_components(&src, &mut labels)?;

        assert_eq!(count, 3);
        #[rustfmt::skip]
        assert_eq!(
            labels.as_slice(),
            &[
                0, 0, 0, 1, 0,
                2, 0, 1, 0, 0,
                2, 0, 0, 0, 3,
                0, 2, 0, 3, 3,
            ]
        );
        Ok(())
    }

    #[test]
    fn components_u_shape_merges_late() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(
            ImageSize { width: 3, height: 3 },
            vec![
                1, 0, 1,
                1, 0, 1,
                1, 1, 1,
            ],
        )?;
        let mut labels = Image::<u32, 1>::from_size_val(src.size(), 0)?;
        assert_eq!(super::connected_components(&src, &mut labels)?, 1);
        assert!(labels
            .as_slice()
            .iter()
            .zip(src.as_slice())
            .all(|(&l, &s)| (s == 0) == (l == 0)));
        Ok(())
    }

    #[test]
    fn components_empty() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        let mut labels = Image::<u32, 1>::from_size_val(src.size(), 7)?;
        assert_eq!(super::connected_components(&src, &mut labels)?, 0);
        assert!(labels.as_slice().iter().all(|&l| l == 0));
        Ok(())
    }
}
