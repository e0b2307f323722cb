//! Pure-Rust engine for fully connected models stored as JSON.
//!
//! A model file is a serialized `Network`: `{ "layers": [...], "metadata": {...} }`.
//! The first layer must accept the flattened 224×224×3 tensor.

use tracing::debug;

use crate::engine::engine::{EngineFactory, EngineOptions, InferenceEngine};
use crate::error::ClassifyError;
use crate::math::tensor::{Tensor, INPUT_SIZE, TENSOR_LEN};
use crate::network::metadata::InputType;
use crate::network::network::Network;

pub struct DenseEngine {
    network: Network,
    threads: usize,
    released: bool,
}

impl DenseEngine {
    /// Validates `network` for use on image tensors.
    pub fn new(network: Network, options: &EngineOptions) -> Result<DenseEngine, String> {
        network.validate()?;
        if network.input_size() != TENSOR_LEN {
            return Err(format!(
                "model expects {} inputs, image tensors have {}",
                network.input_size(), TENSOR_LEN
            ));
        }
        if let Some(InputType::ImageRgb { width, height }) =
            network.metadata.as_ref().and_then(|m| m.input_type.as_ref())
        {
            if (*width, *height) != (INPUT_SIZE, INPUT_SIZE) {
                return Err(format!(
                    "model was built for {}x{} images, not {}x{}",
                    width, height, INPUT_SIZE, INPUT_SIZE
                ));
            }
        }
        Ok(DenseEngine { network, threads: options.threads.max(1), released: false })
    }
}

impl InferenceEngine for DenseEngine {
    fn input_len(&self) -> usize {
        self.network.input_size()
    }

    fn output_len(&self) -> usize {
        self.network.output_size()
    }

    fn run(&mut self, input: &Tensor) -> Result<Vec<f32>, ClassifyError> {
        if self.released {
            return Err(ClassifyError::inference("engine already released"));
        }
        if input.len() != self.input_len() {
            return Err(ClassifyError::inference(format!(
                "input has {} values, model expects {}",
                input.len(), self.input_len()
            )));
        }
        Ok(self.network.forward(input.as_slice(), self.threads))
    }

    fn release(&mut self) {
        self.network.layers = Vec::new();
        self.released = true;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DenseEngineFactory;

impl EngineFactory for DenseEngineFactory {
    fn load(
        &self,
        model: &[u8],
        asset: &str,
        options: &EngineOptions,
    ) -> Result<Box<dyn InferenceEngine>, ClassifyError> {
        if model.is_empty() {
            return Err(ClassifyError::model_load(asset, "model file is empty"));
        }
        let network = Network::from_slice(model)
            .map_err(|e| ClassifyError::model_load(asset, format!("not a model file: {}", e)))?;
        let engine = DenseEngine::new(network, options)
            .map_err(|reason| ClassifyError::model_load(asset, reason))?;
        debug!(model = asset, classes = engine.output_len(), "model loaded");
        Ok(Box::new(engine))
    }
}
