mod kernels;
pub use kernels::Kernel;

mod ops;
pub use ops::{close, dilate, erode, open};
