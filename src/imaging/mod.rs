pub mod raster;
pub mod preprocess;

pub use raster::Raster;
pub use preprocess::ImagePreprocessor;
