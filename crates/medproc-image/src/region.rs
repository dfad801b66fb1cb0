use crate::error::ImageError;
use crate::image::ImageSize;

/// An integer rectangle `(x, y, width, height)` inside an image.
///
/// Coordinates are signed so that rectangles coming from an external selection
/// tool can be validated instead of silently wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    /// Left coordinate of the region.
    pub x: i64,
    /// Top coordinate of the region.
    pub y: i64,
    /// Width of the region in pixels.
    pub width: i64,
    /// Height of the region in pixels.
    pub height: i64,
}

impl Region {
    /// Create a new region.
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check the region against the extent of its parent image.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the parent image.
    ///
    /// # Returns
    ///
    /// The region as unsigned `(x, y, width, height)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidRegion`] if the width or height is not positive
    /// or the rectangle leaves the image.
    pub fn validate(&self, size: ImageSize) -> Result<(usize, usize, usize, usize), ImageError> {
        let inside = self.width > 0
            && self.height > 0
            && self.x >= 0
            && self.y >= 0
            && self.x + self.width <= size.width as i64
            && self.y + self.height <= size.height as i64;

        if !inside {
            return Err(ImageError::InvalidRegion {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                image_width: size.width,
                image_height: size.height,
            });
        }

        Ok((
            self.x as usize,
            self.y as usize,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// The size of the region in pixels, if it is not empty.
    pub fn size(&self) -> Option<ImageSize> {
        (self.width > 0 && self.height > 0).then(|| ImageSize {
            width: self.width as usize,
            height: self.height as usize,
        })
    }
}
