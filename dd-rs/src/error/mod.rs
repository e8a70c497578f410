use crate::kernel::ConfigError;
use core::{error, fmt};

/// Result alias used throughout dd-rs.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised whilst running dd-rs.
///
/// None of these are retried internally; they describe input the routines are
/// not designed to handle and are surfaced to the caller immediately.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The singular value decomposition could not be computed.
    NotFactorizable {
        /// Explaining why the decomposition failed.
        reason: &'static str,
    },
    /// A solve was requested against a decomposition with a singular value at
    /// or below tolerance.
    SingularMatrix {
        /// Position of the offending singular value.
        index: usize,
        /// The offending singular value.
        value: f64,
        /// Tolerance it was compared against.
        tolerance: f64,
    },
    /// A signal was too short, or paired sequences disagreed in length.
    InvalidSignalLength {
        /// Name of the argument.
        arg: &'static str,
        /// Explaining which length rule was violated.
        reason: &'static str,
        /// Received length.
        got: usize,
    },
    /// Matrix or vector shapes are incompatible for the requested product.
    DimensionMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required `(rows, cols)`.
        expected: (usize, usize),
        /// Received `(rows, cols)`.
        got: (usize, usize),
    },
    /// Argument passed into a function was invalid.
    InvalidArg {
        /// The invalid arg
        arg: &'static str,
        /// Explaining why arg is invalid.
        reason: String,
    },
    /// Kernel configuration or buffer binding failed validation.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFactorizable { reason } => write!(f, "Matrix is not factorizable: {reason}"),
            Error::SingularMatrix {
                index,
                value,
                tolerance,
            } => write!(
                f,
                "Singular matrix: singular value {index} ({value:e}) is at or below tolerance {tolerance:e}"
            ),
            Error::InvalidSignalLength { arg, reason, got } => {
                write!(f, "Invalid signal length for `{arg}` ({got}): {reason}")
            }
            Error::DimensionMismatch { arg, expected, got } => write!(
                f,
                "Dimension mismatch on `{arg}`. Expected {}x{}, got {}x{}.",
                expected.0, expected.1, got.0, got.1
            ),
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            Error::Config(err) => write!(f, "{err}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<dd_rs_core::Error> for Error {
    fn from(value: dd_rs_core::Error) -> Self {
        use dd_rs_core::Error as CoreError;
        match value {
            CoreError::InvalidLength { n, .. } => Error::InvalidSignalLength {
                arg: "n",
                reason: "signal length must be at least 2",
                got: n,
            },
            CoreError::IndexOutOfRange { index, n } => Error::InvalidArg {
                arg: "index",
                reason: format!("index {index} is out of range for length {n}"),
            },
            CoreError::FrequencyOutOfRange { freq, n } => Error::InvalidArg {
                arg: "freq",
                reason: format!("frequency index {freq} has no bin for length {n}"),
            },
            CoreError::InvalidSpacing => Error::InvalidArg {
                arg: "d",
                reason: "sample spacing must be finite and > 0".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_length_errors_become_signal_length_errors() {
        let err: Error = dd_rs_core::Error::InvalidLength { n: 1, min: 2 }.into();
        assert!(matches!(err, Error::InvalidSignalLength { got: 1, .. }));
    }

    #[test]
    fn config_errors_keep_their_source() {
        use std::error::Error as _;

        let err: Error = ConfigError::EmptyInput { arg: "signal" }.into();
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Input `signal` was empty.");
    }
}
