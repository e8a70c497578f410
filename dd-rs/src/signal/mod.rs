mod denoise;
mod derivative;
mod fft;
mod fourier_series;
pub mod traits;

pub use denoise::*;
pub use derivative::*;
pub use fft::*;
pub use fourier_series::*;
