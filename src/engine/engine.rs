use tracing::debug;

use crate::error::ClassifyError;
use crate::math::tensor::Tensor;

/// Intra-op thread hint passed to every engine.
pub const INFERENCE_THREADS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub threads: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions { threads: INFERENCE_THREADS }
    }
}

/// A loaded model that maps one input tensor to one probability vector.
///
/// Engines are created per request and never shared between requests, so
/// `run` takes `&mut self`.
pub trait InferenceEngine: Send {
    /// Flat element count the model expects.
    fn input_len(&self) -> usize;

    /// Number of classes the model emits.
    fn output_len(&self) -> usize;

    fn run(&mut self, input: &Tensor) -> Result<Vec<f32>, ClassifyError>;

    /// Frees backend resources. Called exactly once by `EngineSession`.
    fn release(&mut self) {}
}

/// Builds engines from serialized model bytes.
pub trait EngineFactory: Send + Sync {
    /// `asset` is only used to label errors.
    fn load(
        &self,
        model: &[u8],
        asset: &str,
        options: &EngineOptions,
    ) -> Result<Box<dyn InferenceEngine>, ClassifyError>;
}

/// Owns an engine for the span of one classification and releases it when
/// dropped, whichever way that classification ends.
pub struct EngineSession {
    engine: Box<dyn InferenceEngine>,
    asset: String,
}

impl EngineSession {
    pub fn new(engine: Box<dyn InferenceEngine>, asset: impl Into<String>) -> Self {
        EngineSession { engine, asset: asset.into() }
    }

    pub fn engine(&mut self) -> &mut dyn InferenceEngine {
        self.engine.as_mut()
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        self.engine.release();
        debug!(model = %self.asset, "engine released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicUsize>);

    impl InferenceEngine for Counting {
        fn input_len(&self) -> usize { 0 }
        fn output_len(&self) -> usize { 0 }
        fn run(&mut self, _: &Tensor) -> Result<Vec<f32>, ClassifyError> {
            Err(ClassifyError::inference("unused"))
        }
        fn release(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn session_releases_once_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        {
            let mut session = EngineSession::new(Box::new(Counting(released.clone())), "m.json");
            assert_eq!(session.engine().output_len(), 0);
        }
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_thread_hint() {
        assert_eq!(EngineOptions::default().threads, 4);
    }
}
