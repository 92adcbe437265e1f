//! Image-side stages of the pipeline: the decoded bitmap, quantization
//! policies, the packed monochrome grid and the preprocessor that joins them.

pub mod pixel_grid;
pub mod preprocess;
pub mod quantize;
pub mod raster;

pub use pixel_grid::{GridView, PixelGrid};
pub use preprocess::Preprocessor;
pub use quantize::{InkPolicy, Quantization, DEFAULT_THRESHOLD};
pub use raster::{Pixel, RasterImage};
