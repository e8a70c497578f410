mod image;
mod lstsq;
mod svd;

pub use image::*;
pub use lstsq::*;
pub use svd::*;
