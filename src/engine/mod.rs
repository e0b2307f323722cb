pub mod engine;
pub mod dense;

pub use engine::{EngineFactory, EngineOptions, EngineSession, InferenceEngine, INFERENCE_THREADS};
pub use dense::{DenseEngine, DenseEngineFactory};
