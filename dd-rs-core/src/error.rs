use core::{error, fmt};

/// Result alias for `dd-rs-core` helpers.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised by the index helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Sequence length is below the minimum the helper supports.
    InvalidLength {
        /// Received length.
        n: usize,
        /// Minimum supported length.
        min: usize,
    },
    /// A bin or display index was outside `0..n`.
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Sequence length.
        n: usize,
    },
    /// A signed frequency index has no bin for this length.
    FrequencyOutOfRange {
        /// Offending signed frequency index.
        freq: isize,
        /// Sequence length.
        n: usize,
    },
    /// Sample spacing was zero, negative or non-finite.
    InvalidSpacing,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidLength { n, min } => {
                write!(f, "Sequence length {n} is below the minimum of {min}.")
            }
            Error::IndexOutOfRange { index, n } => {
                write!(f, "Index {index} is out of range for length {n}.")
            }
            Error::FrequencyOutOfRange { freq, n } => {
                write!(f, "Frequency index {freq} has no bin for length {n}.")
            }
            Error::InvalidSpacing => write!(f, "Sample spacing must be finite and > 0."),
        }
    }
}

impl error::Error for Error {}
