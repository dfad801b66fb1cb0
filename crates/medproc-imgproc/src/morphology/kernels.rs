use medproc_image::ImageError;

/// A morphological structuring element.
///
/// The kernel stores a binary mask where 1 indicates pixels included in the
/// operation and 0 indicates excluded pixels. It is centered at its geometric center.
///
/// # Example
///
/// ```rust
/// use medproc_imgproc::morphology::Kernel;
///
/// // Create a 3x3 box kernel
/// let kernel = Kernel::box_kernel(3).unwrap();
/// assert_eq!(kernel.width(), 3);
/// assert_eq!(kernel.height(), 3);
/// assert_eq!(kernel.pad(), (1, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Kernel {
    /// Create a square all-ones kernel of side `size`.
    ///
    /// # Errors
    ///
    /// Returns an error if the size is zero or even.
    pub fn box_kernel(size: usize) -> Result<Self, ImageError> {
        if size == 0 || size % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(size));
        }

        Ok(Self {
            data: vec![1; size * size],
            width: size,
            height: size,
        })
    }

    /// Create a kernel from a row-major binary mask.
    ///
    /// # Errors
    ///
    /// Returns an error if a side is even or the mask length does not match.
    pub fn from_mask(data: Vec<u8>, width: usize, height: usize) -> Result<Self, ImageError> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(width.max(height)));
        }

        if data.len() != width * height {
            return Err(ImageError::InvalidKernelLength(data.len(), width * height));
        }

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Get the width of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the kernel mask.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the vertical and horizontal reach of the kernel from its center.
    pub fn pad(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }

    /// Offsets `(dy, dx)` of the active cells relative to the center.
    pub(crate) fn offsets(&self) -> Vec<(isize, isize)> {
        let (pad_h, pad_w) = self.pad();
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 1)
            .map(|(i, _)| {
                (
                    (i / self.width) as isize - pad_h as isize,
                    (i % self.width) as isize - pad_w as isize,
                )
            })
            .collect()
    }
}
