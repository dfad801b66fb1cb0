use medproc_image::Image;

/// Apply a function to each pixel of `src` and the matching pixel of `dst`, row by row.
pub fn iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]),
) {
    let cols = src.cols();
    src.as_slice()
        .chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each sample of `src` and the matching sample of `dst`.
pub fn iter_rows_val<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&T1, &mut T2),
) {
    src.as_slice()
        .iter()
        .zip(dst.as_slice_mut().iter_mut())
        .for_each(|(src_val, dst_val)| {
            f(src_val, dst_val);
        });
}

/// Apply a function to each sample of two sources and the matching sample of `dst`.
pub fn iter_rows_val_two<T1, T2, T3, const C: usize>(
    src1: &Image<T1, C>,
    src2: &Image<T2, C>,
    dst: &mut Image<T3, C>,
    f: impl Fn(&T1, &T2, &mut T3),
) {
    src1.as_slice()
        .iter()
        .zip(src2.as_slice().iter())
        .zip(dst.as_slice_mut().iter_mut())
        .for_each(|((src1_val, src2_val), dst_val)| {
            f(src1_val, src2_val, dst_val);
        });
}
