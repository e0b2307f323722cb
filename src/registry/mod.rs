pub mod crop;
pub mod labels;

pub use crop::{AssetRef, Crop, CropModelRegistry, CropProfile, Resolution, ResolvedVia, DEFAULT_CROP};
pub use labels::LabelSet;
