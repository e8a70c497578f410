mod fftfreq;

pub use fftfreq::*;
