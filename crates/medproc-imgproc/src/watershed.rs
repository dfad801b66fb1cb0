use std::collections::VecDeque;

use medproc_image::{Image, ImageError};

/// Marker value of the pixels separating two basins.
pub const WATERSHED_BOUNDARY: i32 = -1;

/// Marker value of the pixels waiting in the flooding queue.
const IN_QUEUE: i32 = -2;

/// Number of priority levels, one per 8-bit difference.
const NUM_LEVELS: usize = 256;

/// Maximum absolute channel difference between two pixels.
#[inline]
fn pixel_diff<const C: usize>(data: &[u8], a: usize, b: usize) -> usize {
    (0..C)
        .map(|ch| (data[a * C + ch] as i32 - data[b * C + ch] as i32).unsigned_abs() as usize)
        .max()
        .unwrap_or(0)
}

/// Flood the unknown pixels of a marker map from its seeds.
///
/// `markers` holds positive labels for the seeds and 0 for the unknown pixels.
/// Unknown pixels are flooded from the seeds in order of increasing color
/// difference with their already labelled 4-neighbours, one FIFO queue per
/// difference level. A pixel reached by two different labels becomes
/// [`WATERSHED_BOUNDARY`], as does the one pixel frame of the image.
///
/// # Arguments
///
/// * `src` - The image driving the flooding priority.
/// * `markers` - The marker map, updated in place with the final labels.
///
/// # Example
///
/// ```
/// use medproc_image::{Image, ImageSize};
/// use medproc_imgproc::watershed::{watershed, WATERSHED_BOUNDARY};
///
/// let size = ImageSize { width: 5, height: 3 };
/// let image = Image::<u8, 1>::new(size, vec![0, 0, 90, 0, 0, 0, 0, 90, 0, 0, 0, 0, 90, 0, 0]).unwrap();
/// let mut markers = Image::<i32, 1>::from_size_val(size, 0).unwrap();
/// markers.set_pixel(1, 1, 0, 1).unwrap();
/// markers.set_pixel(3, 1, 0, 2).unwrap();
///
/// watershed(&image, &mut markers).unwrap();
/// assert_eq!(*markers.get_pixel(2, 1, 0).unwrap(), WATERSHED_BOUNDARY);
/// ```
pub fn watershed<const C: usize>(
    src: &Image<u8, C>,
    markers: &mut Image<i32, 1>,
) -> Result<(), ImageError> {
    if src.size() != markers.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            markers.cols(),
            markers.rows(),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    let data = src.as_slice();
    let mask = markers.as_slice_mut();

    let mut queues: Vec<VecDeque<usize>> = vec![VecDeque::new(); NUM_LEVELS];

    // one pixel frame of boundary pixels
    for c in 0..cols {
        mask[c] = WATERSHED_BOUNDARY;
        mask[(rows - 1) * cols + c] = WATERSHED_BOUNDARY;
    }
    for r in 0..rows {
        mask[r * cols] = WATERSHED_BOUNDARY;
        mask[r * cols + cols - 1] = WATERSHED_BOUNDARY;
    }

    if rows < 3 || cols < 3 {
        return Ok(());
    }

    let neighbours = |idx: usize| [idx - 1, idx + 1, idx - cols, idx + cols];

    // queue the unknown pixels touching a seed
    for r in 1..rows - 1 {
        for c in 1..cols - 1 {
            let idx = r * cols + c;
            if mask[idx] < 0 {
                mask[idx] = 0;
            }
            if mask[idx] != 0 {
                continue;
            }

            let priority = neighbours(idx)
                .iter()
                .filter(|&&n| mask[n] > 0)
                .map(|&n| pixel_diff::<C>(data, idx, n))
                .min();

            if let Some(priority) = priority {
                queues[priority].push_back(idx);
                mask[idx] = IN_QUEUE;
            }
        }
    }

    let Some(mut active) = queues.iter().position(|q| !q.is_empty()) else {
        return Ok(());
    };

    loop {
        if queues[active].is_empty() {
            match (active + 1..NUM_LEVELS).find(|&i| !queues[i].is_empty()) {
                Some(next) => active = next,
                None => break,
            }
        }

        let Some(idx) = queues[active].pop_front() else {
            continue;
        };

        let mut label = 0;
        for n in neighbours(idx) {
            let t = mask[n];
            if t > 0 {
                if label == 0 {
                    label = t;
                } else if t != label {
                    label = WATERSHED_BOUNDARY;
                }
            }
        }

        mask[idx] = label;
        if label == WATERSHED_BOUNDARY {
            continue;
        }

        for n in neighbours(idx) {
            if mask[n] == 0 {
                let priority = pixel_diff::<C>(data, idx, n);
                queues[priority].push_back(n);
                active = active.min(priority);
                mask[n] = IN_QUEUE;
            }
        }
    }

    Ok(())
}
