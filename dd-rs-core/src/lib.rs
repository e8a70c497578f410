//! numpy-like helpers shared by `dd-rs`.
//!
//! Everything here is integer index arithmetic over sequence lengths, so the
//! crate is `no_std` and only needs `alloc` for the owned outputs.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod error;
pub use error::*;

/// Helpers mirroring numpy's `fft` index utilities.
pub mod num_rs;
