/// How spatial operations read samples outside of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// Repeat the edge sample: `aaa|abcd|ddd`.
    Replicate,
    /// Mirror around the edge sample without repeating it: `dcb|abcd|cba`.
    Reflect101,
}

impl BorderMode {
    /// Fold a coordinate of a dimension of length `len` into `[0, len)`.
    ///
    /// Coordinates far outside the image keep folding, so windows wider than
    /// the image are handled. `len` must be positive.
    #[inline]
    pub fn fold(&self, i: isize, len: usize) -> usize {
        let last = len as isize - 1;
        match self {
            BorderMode::Replicate => i.clamp(0, last) as usize,
            BorderMode::Reflect101 if last == 0 => 0,
            BorderMode::Reflect101 => {
                // the mirrored sequence is periodic with period 2 * last
                let period = 2 * last;
                let i = i.rem_euclid(period);
                (if i > last { period - i } else { i }) as usize
            }
        }
    }
}
