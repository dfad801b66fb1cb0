use crate::error::ImageError;
use crate::image::{Image, ImageSize};

/// An 8-bit image whose channel count is only known at runtime.
///
/// Buffers come from external loaders as raw samples; this type checks the
/// input contract once and then dispatches to the typed [`Image`] operations.
/// Three channel buffers hold their samples in R, G, B order.
#[derive(Clone, Debug, PartialEq)]
pub enum PixelBuffer {
    /// Single channel buffer.
    Gray(Image<u8, 1>),
    /// Three channel buffer.
    Rgb(Image<u8, 3>),
}

/// Apply an expression to the typed image inside a [`PixelBuffer`] and wrap the
/// resulting image back into the same variant.
///
/// The expression is expanded once per variant, so it may be generic over the
/// number of channels and may use `?`.
///
/// # Examples
///
/// ```
/// use medproc_image::{map_buffer, PixelBuffer};
///
/// let buffer = PixelBuffer::new(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
/// let inverted = map_buffer!(&buffer, |img| img.map(|v| 255 - v));
/// assert_eq!(inverted.as_slice(), &[254, 253, 252, 251, 250, 249]);
/// ```
#[macro_export]
macro_rules! map_buffer {
    ($buffer:expr, |$img:ident| $body:expr) => {
        match $buffer {
            $crate::PixelBuffer::Gray($img) => $crate::PixelBuffer::Gray($body),
            $crate::PixelBuffer::Rgb($img) => $crate::PixelBuffer::Rgb($body),
        }
    };
}

/// Evaluate an expression on the typed image inside a [`PixelBuffer`].
///
/// Both arms must produce the same type.
#[macro_export]
macro_rules! with_buffer {
    ($buffer:expr, |$img:ident| $body:expr) => {
        match $buffer {
            $crate::PixelBuffer::Gray($img) => $body,
            $crate::PixelBuffer::Rgb($img) => $body,
        }
    };
}

impl PixelBuffer {
    /// Create a buffer from raw row-major samples.
    ///
    /// # Arguments
    ///
    /// * `width` - The width of the buffer in pixels, must be positive.
    /// * `height` - The height of the buffer in pixels, must be positive.
    /// * `channels` - The number of channels, 1 or 3.
    /// * `data` - The samples, `width * height * channels` of them.
    ///
    /// # Errors
    ///
    /// * [`ImageError::UnsupportedChannelCount`] if `channels` is not 1 or 3.
    /// * [`ImageError::InvalidBuffer`] if a dimension is zero.
    /// * [`ImageError::InvalidChannelShape`] if the data length does not match.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let size = ImageSize { width, height };
        match channels {
            1 => Ok(Self::Gray(Image::new(size, data)?)),
            3 => Ok(Self::Rgb(Image::new(size, data)?)),
            c => Err(ImageError::UnsupportedChannelCount(c)),
        }
    }

    /// Create a buffer filled with a single value.
    pub fn from_size_val(size: ImageSize, channels: usize, val: u8) -> Result<Self, ImageError> {
        Self::new(
            size.width,
            size.height,
            channels,
            vec![val; size.area() * channels],
        )
    }

    /// Get the size of the buffer in pixels.
    pub fn size(&self) -> ImageSize {
        with_buffer!(self, |img| img.size())
    }

    /// Get the width of the buffer in pixels.
    pub fn width(&self) -> usize {
        self.size().width
    }

    /// Get the height of the buffer in pixels.
    pub fn height(&self) -> usize {
        self.size().height
    }

    /// Get the number of channels of the buffer.
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray(_) => 1,
            Self::Rgb(_) => 3,
        }
    }

    /// Get the samples as a slice.
    pub fn as_slice(&self) -> &[u8] {
        with_buffer!(self, |img| img.as_slice())
    }

    /// Consume the buffer and return its samples.
    pub fn into_vec(self) -> Vec<u8> {
        with_buffer!(self, |img| img.into_vec())
    }
}

impl From<Image<u8, 1>> for PixelBuffer {
    fn from(image: Image<u8, 1>) -> Self {
        Self::Gray(image)
    }
}

impl From<Image<u8, 3>> for PixelBuffer {
    fn from(image: Image<u8, 3>) -> Self {
        Self::Rgb(image)
    }
}
