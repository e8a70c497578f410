use crate::{Error, Result};
use alloc::vec::Vec;

/// Smallest sequence length with a meaningful frequency axis.
pub const MIN_LEN: usize = 2;

fn check_len(n: usize) -> Result<()> {
    if n < MIN_LEN {
        return Err(Error::InvalidLength { n, min: MIN_LEN });
    }
    Ok(())
}

/// Number of bins holding non-negative frequencies, `ceil(n / 2)`.
pub fn positive_bins(n: usize) -> usize {
    n - n / 2
}

/// Signed frequency index of `bin` for a length-`n` transform.
///
/// Bins `0..ceil(n/2)` carry the non-negative frequencies `0, 1, ...`, the
/// remaining bins carry the negative frequencies `bin - n`. For even `n` the
/// Nyquist bin `n / 2` maps to `-n / 2`, as numpy's `fftfreq` does.
///
/// # Examples
/// ```
/// use dd_rs_core::num_rs::frequency_index;
///
/// let idx: Vec<isize> = (0..4).map(|k| frequency_index(k, 4).unwrap()).collect();
/// assert_eq!(idx, vec![0, 1, -2, -1]);
/// let idx: Vec<isize> = (0..5).map(|k| frequency_index(k, 5).unwrap()).collect();
/// assert_eq!(idx, vec![0, 1, 2, -2, -1]);
/// ```
pub fn frequency_index(bin: usize, n: usize) -> Result<isize> {
    check_len(n)?;
    if bin >= n {
        return Err(Error::IndexOutOfRange { index: bin, n });
    }
    if bin < positive_bins(n) {
        Ok(bin as isize)
    } else {
        Ok(bin as isize - n as isize)
    }
}

/// Bin holding the signed frequency index `freq`; inverse of [`frequency_index`].
pub fn bin_index(freq: isize, n: usize) -> Result<usize> {
    check_len(n)?;
    let lowest = -((n / 2) as isize);
    let highest = positive_bins(n) as isize - 1;
    if freq < lowest || freq > highest {
        return Err(Error::FrequencyOutOfRange { freq, n });
    }
    if freq >= 0 {
        Ok(freq as usize)
    } else {
        Ok((freq + n as isize) as usize)
    }
}

/// Bin shown at position `centered` of a zero-centred spectrum.
///
/// Position `i` of the centred axis carries frequency `i - n/2`, so
/// `coeffs[shift_index(i, n)]` walks the spectrum from the most negative
/// frequency to the most positive one.
///
/// # Examples
/// ```
/// use dd_rs_core::num_rs::shift_index;
///
/// let order: Vec<usize> = (0..4).map(|i| shift_index(i, 4).unwrap()).collect();
/// assert_eq!(order, vec![2, 3, 0, 1]);
/// ```
pub fn shift_index(centered: usize, n: usize) -> Result<usize> {
    check_len(n)?;
    if centered >= n {
        return Err(Error::IndexOutOfRange { index: centered, n });
    }
    bin_index(centered as isize - (n / 2) as isize, n)
}

/// Centred display position of `bin`; inverse of [`shift_index`].
pub fn unshift_index(bin: usize, n: usize) -> Result<usize> {
    let freq = frequency_index(bin, n)?;
    Ok((freq + (n / 2) as isize) as usize)
}

/// Sample frequencies of each bin, `frequency_index(k) / (n * d)`.
///
/// # Examples
/// ```
/// use dd_rs_core::num_rs::fftfreq;
///
/// let f = fftfreq(4, 0.25).unwrap();
/// assert_eq!(f, vec![0.0, 1.0, -2.0, -1.0]);
/// ```
pub fn fftfreq(n: usize, d: f64) -> Result<Vec<f64>> {
    check_len(n)?;
    if !d.is_finite() || d <= 0.0 {
        return Err(Error::InvalidSpacing);
    }
    let scale = 1.0 / (n as f64 * d);
    (0..n)
        .map(|k| frequency_index(k, n).map(|idx| idx as f64 * scale))
        .collect()
}

/// Reorder bins so the zero frequency sits at the centre.
///
/// Sequences shorter than two are returned unchanged.
pub fn fftshift<T: Clone>(x: &[T]) -> Vec<T> {
    let n = x.len();
    x.iter().cycle().skip(n - n / 2).take(n).cloned().collect()
}

/// Undo [`fftshift`].
pub fn ifftshift<T: Clone>(x: &[T]) -> Vec<T> {
    let n = x.len();
    x.iter().cycle().skip(n / 2).take(n).cloned().collect()
}
