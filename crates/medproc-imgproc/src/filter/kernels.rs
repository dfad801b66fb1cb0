use medproc_image::ImageError;

/// Fixed binomial kernels used for small sizes when the sigma is derived from the size.
const SMALL_GAUSSIAN_TAB: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Derive the gaussian standard deviation from the kernel size.
///
/// sigma = 0.3 * ((kernel_size - 1) * 0.5 - 1) + 0.8
pub fn sigma_from_kernel_size(kernel_size: usize) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create a gaussian blur kernel whose sigma is derived from its size.
///
/// Sizes 1, 3, 5 and 7 use fixed binomial coefficients, larger sizes use
/// [`sigma_from_kernel_size`].
///
/// # Errors
///
/// Returns an error if the kernel size is zero or even.
pub fn gaussian_kernel_1d_auto(kernel_size: usize) -> Result<Vec<f32>, ImageError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    match SMALL_GAUSSIAN_TAB.get(kernel_size / 2) {
        Some(tab) => Ok(tab.to_vec()),
        None => Ok(gaussian_kernel_1d(
            kernel_size,
            sigma_from_kernel_size(kernel_size),
        )),
    }
}

/// Create a sobel kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel, only 3 is supported.
///
/// # Returns
///
/// The derivative and the smoothing part of the separable kernel.
pub fn sobel_kernel_1d(kernel_size: usize) -> Result<([i32; 3], [i32; 3]), ImageError> {
    match kernel_size {
        3 => Ok(([-1, 0, 1], [1, 2, 1])),
        _ => Err(ImageError::InvalidKernelSize(kernel_size)),
    }
}

/// The 3x3 sharpening kernel, center weight 9 and all neighbours -1.
#[rustfmt::skip]
pub const SHARPEN_KERNEL: [f32; 9] = [
    -1.0, -1.0, -1.0,
    -1.0,  9.0, -1.0,
    -1.0, -1.0, -1.0,
];

/// Round a kernel size up to the next odd value.
///
/// # Errors
///
/// Returns an error if the kernel size is zero.
pub fn odd_kernel_size(kernel_size: usize) -> Result<usize, ImageError> {
    match kernel_size {
        0 => Err(ImageError::InvalidKernelSize(kernel_size)),
        k if k % 2 == 0 => Ok(k + 1),
        k => Ok(k),
    }
}
