use super::ConfigError;

use nalgebra::{DVector, Scalar};
use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Adapter trait for reading contiguous 1D input.
pub trait Read1D<T> {
    /// Borrow the underlying input as a contiguous slice.
    fn read_slice(&self) -> Result<&[T], ConfigError>;
}

/// Adapter trait for writing contiguous 1D output.
pub trait Write1D<T> {
    /// Borrow the underlying output as a mutable contiguous slice.
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError>;
}

impl<T> Read1D<T> for [T] {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self)
    }
}

impl<T> Write1D<T> for [T] {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self)
    }
}

impl<T, const N: usize> Read1D<T> for [T; N] {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self)
    }
}

impl<T, const N: usize> Write1D<T> for [T; N] {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self)
    }
}

impl<T> Read1D<T> for Vec<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self.as_slice())
    }
}

impl<T> Write1D<T> for Vec<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self.as_mut_slice())
    }
}

impl<T> Read1D<T> for Array1<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice()
            .ok_or(ConfigError::NonContiguous { arg: "array" })
    }
}

impl<T> Write1D<T> for Array1<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut()
            .ok_or(ConfigError::NonContiguous { arg: "array" })
    }
}

impl<'a, T> Read1D<T> for ArrayView1<'a, T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice()
            .ok_or(ConfigError::NonContiguous { arg: "array_view" })
    }
}

impl<'a, T> Write1D<T> for ArrayViewMut1<'a, T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut().ok_or(ConfigError::NonContiguous {
            arg: "array_view_mut",
        })
    }
}

// Column vectors are always contiguous.
impl<T: Scalar> Read1D<T> for DVector<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self.as_slice())
    }
}

impl<T: Scalar> Write1D<T> for DVector<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self.as_mut_slice())
    }
}

/// Borrow `input` and require at least two samples.
pub(crate) fn read_signal<'a, T, I>(arg: &'static str, input: &'a I) -> crate::Result<&'a [T]>
where
    I: Read1D<T> + ?Sized,
{
    let slice = input.read_slice()?;
    if slice.len() < 2 {
        return Err(crate::Error::InvalidSignalLength {
            arg,
            reason: "signal length must be at least 2",
            got: slice.len(),
        });
    }
    Ok(slice)
}

/// Borrow `out` and require exactly `expected` elements.
pub(crate) fn write_exact<'a, T, O>(
    arg: &'static str,
    out: &'a mut O,
    expected: usize,
) -> crate::Result<&'a mut [T]>
where
    O: Write1D<T> + ?Sized,
{
    let slice = out.write_slice_mut()?;
    if slice.len() != expected {
        return Err(ConfigError::LengthMismatch {
            arg,
            expected,
            got: slice.len(),
        }
        .into());
    }
    Ok(slice)
}

#[cfg(test)]
mod tests {
    use super::{read_signal, write_exact, Read1D, Write1D};
    use crate::Complex;
    use crate::Error;

    #[test]
    fn slice_and_array_adapters() {
        let a = [1.0f64, 2.0, 3.0];
        assert_eq!(a.read_slice().expect("array adapter").len(), 3);

        let s: &[f64] = &a;
        assert_eq!(s.read_slice().expect("slice adapter")[1], 2.0);
    }

    #[test]
    fn complex_vec_write_adapter() {
        let mut out = vec![Complex::new(0.0, 0.0); 2];
        let slice = out.write_slice_mut().expect("vec write adapter");
        slice.copy_from_slice(&[Complex::new(1.0, -1.0), Complex::new(0.0, 2.0)]);
        assert_eq!(out[1], Complex::new(0.0, 2.0));
    }

    #[test]
    fn ndarray_and_nalgebra_adapters() {
        use nalgebra::DVector;
        use ndarray::Array1;

        let arr = Array1::from(vec![1.0f64, 2.0, 3.0]);
        assert_eq!(arr.read_slice().expect("array1 read")[2], 3.0);

        let mut col = DVector::from_vec(vec![0.0f64; 3]);
        col.write_slice_mut()
            .expect("dvector write")
            .copy_from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(col.read_slice().expect("dvector read"), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn strided_views_are_rejected() {
        use ndarray::{s, Array1};

        let arr = Array1::from(vec![1.0f64, 2.0, 3.0, 4.0]);
        let view = arr.slice(s![..;2]);
        assert!(view.read_slice().is_err());
    }

    #[test]
    fn signal_helpers_check_lengths() {
        let short = [1.0f64];
        let err = read_signal("signal", &short[..]).expect_err("too short");
        assert!(matches!(err, Error::InvalidSignalLength { got: 1, .. }));

        let mut out = vec![0.0f64; 3];
        let err = write_exact("out", &mut out, 4).expect_err("wrong length");
        assert!(matches!(err, Error::Config(_)));
    }
}
