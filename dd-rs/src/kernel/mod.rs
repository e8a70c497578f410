//! Shared kernel substrate.
//!
//! Reusable interfaces for constructor validation and 1D buffer adapters used
//! by the linear-algebra and spectral kernels.

mod errors;
mod io;
mod lifecycle;

pub use errors::*;
pub use io::*;
pub use lifecycle::*;
