mod gray;
mod lab;
mod yuv;

pub use gray::{from_luma, gray_from_rgb_u8, rgb_from_gray, to_luma};
pub use lab::{lab_from_rgb_u8, rgb_from_lab_u8};
pub use yuv::{rgb_from_yuv_u8, yuv_from_rgb_u8};

/// Fixed point precision used by the 8-bit color conversions.
pub(crate) const SHIFT: u32 = 14;

/// Round and shift a fixed point value back to integer precision.
#[inline]
pub(crate) fn descale(x: i32) -> i32 {
    (x + (1 << (SHIFT - 1))) >> SHIFT
}
