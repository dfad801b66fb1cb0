#![deny(missing_docs)]
//! Pixel buffer types for the medproc image pipeline

/// image representation for image processing purposes.
pub mod image;

/// runtime channel buffer over the typed images.
pub mod buffer;

/// Error types for the image module.
pub mod error;

/// rectangular regions of interest.
pub mod region;

pub use crate::buffer::PixelBuffer;
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
pub use crate::region::Region;
