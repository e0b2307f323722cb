pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod imaging;
pub mod assets;
pub mod registry;
pub mod engine;
pub mod classify;
pub mod advisory;
pub mod diagnosis;
pub mod config;
pub mod scaffold;

// Convenience re-exports
pub use error::{AssetError, CatalogLoadError, ClassifyError, Stage};
pub use math::tensor::Tensor;
pub use network::network::Network;
pub use imaging::preprocess::ImagePreprocessor;
pub use imaging::raster::Raster;
pub use assets::provider::{AssetProvider, DirAssets, MemoryAssets};
pub use registry::crop::{Crop, CropModelRegistry, CropProfile};
pub use registry::labels::LabelSet;
pub use engine::engine::{EngineFactory, EngineOptions, InferenceEngine};
pub use engine::dense::DenseEngineFactory;
pub use classify::classifier::{ClassificationResult, Classifier};
pub use advisory::catalog::AdvisoryCatalog;
pub use advisory::language::Language;
pub use advisory::record::AdvisoryRecord;
pub use advisory::resolver::AdvisoryResolver;
pub use diagnosis::{DiagnosisResponse, DiagnosisService};
pub use config::AppConfig;
