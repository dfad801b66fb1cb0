mod bilateral;
pub use bilateral::bilateral_filter;

mod canny;
pub use canny::{canny, sobel_gradients};

/// Utilities to create kernels for image filtering.
pub mod kernels;

mod median;
pub use median::median_blur;

mod ops;
pub use ops::{filter2d, gaussian_blur, sharpen};

mod separable_filter;
pub use separable_filter::separable_filter;
