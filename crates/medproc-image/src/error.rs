/// An error type for the image module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Error when the buffer is empty or has a zero dimension.
    #[error("Invalid buffer of size {0}x{1}")]
    InvalidBuffer(usize, usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the number of channels is not supported.
    #[error("Unsupported number of channels: {0}, expected 1 or 3")]
    UnsupportedChannelCount(usize),

    /// Error when the region is empty or out of the image bounds.
    #[error("Invalid region ({x}, {y}, {width}, {height}) for image of size {image_width}x{image_height}")]
    InvalidRegion {
        /// Left coordinate of the region.
        x: i64,
        /// Top coordinate of the region.
        y: i64,
        /// Width of the region.
        width: i64,
        /// Height of the region.
        height: i64,
        /// Width of the parent image.
        image_width: usize,
        /// Height of the parent image.
        image_height: usize,
    },

    /// Error when the image sizes do not match.
    #[error("Image size mismatch ({0}x{1}) != ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds {1}")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the kernel size is not valid.
    #[error("Invalid kernel size {0}")]
    InvalidKernelSize(usize),

    /// Error when a kernel has the wrong number of coefficients.
    #[error("Invalid kernel length {0}, expected {1}")]
    InvalidKernelLength(usize, usize),

    /// Error when the number of histogram bins is not valid.
    #[error("Invalid number of histogram bins {0}")]
    InvalidHistogramBins(usize),

    /// Error when a numeric parameter is not valid.
    #[error("Invalid value {1} for parameter {0}")]
    InvalidParameter(&'static str, f64),
}
