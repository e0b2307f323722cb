use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::assets::provider::AssetProvider;
use crate::classify::top1::top1;
use crate::engine::engine::{EngineFactory, EngineOptions, EngineSession};
use crate::error::ClassifyError;
use crate::imaging::preprocess::ImagePreprocessor;
use crate::imaging::raster::Raster;
use crate::math::tensor::Tensor;
use crate::registry::crop::{Crop, CropModelRegistry, CropProfile};
use crate::registry::labels::LabelSet;

/// Top-1 prediction for one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// The crop whose model ran, after alias and default resolution.
    pub crop: Crop,
    pub disease_label: String,
    /// Unrounded probability in `[0, 1]`.
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn crop_id(&self) -> &'static str {
        self.crop.id()
    }
}

/// Runs the crop's model on an image and picks the most likely label.
///
/// Holds no engine between calls. Every call reads the crop's model and
/// labels, builds its own engine, and releases it before returning, so a
/// `Classifier` can be shared across threads behind an `Arc`.
pub struct Classifier {
    registry: CropModelRegistry,
    assets: Arc<dyn AssetProvider>,
    factory: Arc<dyn EngineFactory>,
    preprocessor: ImagePreprocessor,
    options: EngineOptions,
}

impl Classifier {
    pub fn new(assets: Arc<dyn AssetProvider>, factory: Arc<dyn EngineFactory>) -> Self {
        Classifier {
            registry: CropModelRegistry::new(),
            assets,
            factory,
            preprocessor: ImagePreprocessor::new(),
            options: EngineOptions::default(),
        }
    }

    /// Encoded image bytes → prediction.
    pub fn classify(&self, image: &[u8], crop_id: &str) -> Result<ClassificationResult, ClassifyError> {
        let resolution = self.registry.resolve(crop_id);
        let tensor = self.preprocessor.preprocess_bytes(image)?;
        self.run_profile(resolution.profile, &tensor)
    }

    pub fn classify_raster<R: Raster + ?Sized>(
        &self,
        raster: &R,
        crop_id: &str,
    ) -> Result<ClassificationResult, ClassifyError> {
        let resolution = self.registry.resolve(crop_id);
        let tensor = self.preprocessor.preprocess(raster)?;
        self.run_profile(resolution.profile, &tensor)
    }

    pub fn classify_tensor(&self, tensor: &Tensor, crop_id: &str) -> Result<ClassificationResult, ClassifyError> {
        let resolution = self.registry.resolve(crop_id);
        self.run_profile(resolution.profile, tensor)
    }

    fn load_labels(&self, profile: &CropProfile) -> Result<LabelSet, ClassifyError> {
        let name = profile.labels.name();
        let bytes = self
            .assets
            .read_all(name)
            .map_err(|e| ClassifyError::model_load(name, e.to_string()))?;
        LabelSet::parse(&bytes, name)
    }

    fn open_session(&self, profile: &CropProfile) -> Result<EngineSession, ClassifyError> {
        let name = profile.model.name();
        let bytes = self
            .assets
            .read_all(name)
            .map_err(|e| ClassifyError::model_load(name, e.to_string()))?;
        let engine = self.factory.load(&bytes, name, &self.options)?;
        Ok(EngineSession::new(engine, name))
    }

    fn run_profile(&self, profile: &CropProfile, tensor: &Tensor) -> Result<ClassificationResult, ClassifyError> {
        let labels = self.load_labels(profile)?;
        let mut session = self.open_session(profile)?;
        let engine = session.engine();

        if engine.input_len() != tensor.len() {
            return Err(ClassifyError::inference(format!(
                "model expects {} inputs, tensor has {}",
                engine.input_len(), tensor.len()
            )));
        }
        if engine.output_len() != labels.len() {
            return Err(ClassifyError::inference(format!(
                "model emits {} classes but {} lists {} labels",
                engine.output_len(), profile.labels.name(), labels.len()
            )));
        }

        debug!(crop = profile.crop_id(), threads = self.options.threads, "running inference");
        let probabilities = engine.run(tensor)?;
        if probabilities.len() != labels.len() {
            return Err(ClassifyError::inference(format!(
                "model returned {} probabilities for {} labels",
                probabilities.len(), labels.len()
            )));
        }

        let (index, confidence) = top1(&probabilities)?;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ClassifyError::inference(format!(
                "top probability {} is outside [0, 1]", confidence
            )));
        }
        let disease_label = labels
            .get(index)
            .ok_or_else(|| ClassifyError::inference(format!("no label for class {}", index)))?
            .to_owned();

        info!(crop = profile.crop_id(), disease = %disease_label, confidence, "classified");
        Ok(ClassificationResult { crop: profile.crop, disease_label, confidence })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::assets::provider::MemoryAssets;
    use crate::engine::dense::DenseEngineFactory;
    use crate::engine::engine::InferenceEngine;
    use crate::error::Stage;
    use crate::math::tensor::TENSOR_LEN;
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Engine whose output is the comma-separated probabilities stored as
    /// its "model" bytes.
    struct Scripted {
        probabilities: Vec<f32>,
        released: Arc<AtomicUsize>,
    }

    impl InferenceEngine for Scripted {
        fn input_len(&self) -> usize { TENSOR_LEN }
        fn output_len(&self) -> usize { self.probabilities.len() }
        fn run(&mut self, _: &Tensor) -> Result<Vec<f32>, ClassifyError> {
            Ok(self.probabilities.clone())
        }
        fn release(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    pub(crate) struct ScriptedFactory {
        pub loads: AtomicUsize,
        pub released: Arc<AtomicUsize>,
    }

    impl EngineFactory for ScriptedFactory {
        fn load(&self, model: &[u8], asset: &str, _: &EngineOptions) -> Result<Box<dyn InferenceEngine>, ClassifyError> {
            let text = std::str::from_utf8(model).map_err(|e| ClassifyError::model_load(asset, e.to_string()))?;
            let probabilities = text
                .split(',')
                .map(|p| p.trim().parse::<f32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ClassifyError::model_load(asset, e.to_string()))?;
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(Scripted { probabilities, released: self.released.clone() }))
        }
    }

    pub(crate) fn crop_assets() -> MemoryAssets {
        MemoryAssets::new()
            .with("tomato_model.json", "0.1, 0.7, 0.2")
            .with("tomato_labels.txt", "Healthy\nLate_blight\nEarly_blight\n")
            .with("rice_model.json", "0.05, 0.05, 0.8, 0.1")
            .with("rice_labels.txt", "Bacterial_blight\nBrown_spot\nLeaf_smut\nHealthy\n")
            .with("potato_model.json", "0.6, 0.3, 0.1")
            .with("potato_labels.txt", "Potato___Early_blight\nPotato___Late_blight\nPotato___healthy\n")
            .with("corn_model.json", "0.2, 0.2, 0.5, 0.1")
            .with(
                "corn_labels.txt",
                "Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot\nCorn_(maize)___Common_rust_\nCorn_(maize)___Northern_Leaf_Blight\nCorn_(maize)___healthy\n",
            )
    }

    fn classifier(assets: MemoryAssets) -> (Classifier, Arc<ScriptedFactory>) {
        let factory = Arc::new(ScriptedFactory::default());
        (Classifier::new(Arc::new(assets), factory.clone()), factory)
    }

    fn blank() -> Tensor {
        Tensor::from_vec(vec![0.0; TENSOR_LEN]).unwrap()
    }

    fn png(w: u32, h: u32) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([40, 160, 40])))
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn top_label_and_unrounded_confidence() {
        let (c, _) = classifier(crop_assets());
        let r = c.classify_tensor(&blank(), "tomato").unwrap();
        assert_eq!(r.disease_label, "Late_blight");
        assert_eq!(r.confidence, 0.7);
        assert_eq!(r.crop_id(), "tomato");
    }

    #[test]
    fn every_crop_uses_its_own_labels() {
        let (c, _) = classifier(crop_assets());
        let assets = crop_assets();
        for crop in ["corn", "maize", "potato", "rice", "tomato"] {
            let r = c.classify_tensor(&blank(), crop).unwrap();
            let own = LabelSet::parse(
                &assets.read_all(&format!("{}_labels.txt", r.crop_id())).unwrap(),
                "labels",
            )
            .unwrap();
            assert!(own.iter().any(|l| l == r.disease_label), "{crop}: {}", r.disease_label);
            assert!((0.0..=1.0).contains(&r.confidence));
        }
    }

    #[test]
    fn unknown_crop_runs_tomato_model() {
        let (c, _) = classifier(crop_assets());
        let r = c.classify_tensor(&blank(), "wheat").unwrap();
        assert_eq!(r.crop, Crop::Tomato);
        assert_eq!(r.disease_label, "Late_blight");
    }

    #[test]
    fn encoded_image_of_any_size() {
        let (c, _) = classifier(crop_assets());
        for (w, h) in [(10, 10), (640, 480)] {
            let r = c.classify(&png(w, h), "Maize").unwrap();
            assert_eq!(r.crop, Crop::Corn);
            assert_eq!(r.disease_label, "Corn_(maize)___Northern_Leaf_Blight");
        }
    }

    #[test]
    fn decoded_raster_input() {
        let (c, _) = classifier(crop_assets());
        let r = c.classify_raster(&RgbImage::from_pixel(5, 7, Rgb([0, 0, 0])), "rice").unwrap();
        assert_eq!(r.disease_label, "Leaf_smut");
    }

    #[test]
    fn label_count_mismatch_is_inference_error() {
        let assets = crop_assets().with("potato_labels.txt", "a\nb\n");
        let (c, factory) = classifier(assets);
        let err = c.classify_tensor(&blank(), "potato").unwrap_err();
        assert_eq!(err.stage(), Stage::Infer);
        assert_eq!(factory.released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn non_finite_output_is_inference_error_and_releases() {
        let assets = crop_assets().with("rice_model.json", "0.1, NaN, 0.2, 0.3");
        let (c, factory) = classifier(assets);
        let err = c.classify_tensor(&blank(), "rice").unwrap_err();
        assert!(matches!(err, ClassifyError::Inference(_)));
        assert_eq!(factory.loads.load(Ordering::SeqCst), 1);
        assert_eq!(factory.released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn decode_failure_never_loads_a_model() {
        let (c, factory) = classifier(crop_assets());
        let err = c.classify(b"definitely not an image", "rice").unwrap_err();
        assert_eq!(err.stage(), Stage::Decode);
        assert_eq!(factory.loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_assets_are_model_load_errors() {
        let (c, _) = classifier(MemoryAssets::new().with("rice_labels.txt", "Healthy\n"));
        let err = c.classify_tensor(&blank(), "rice").unwrap_err();
        assert!(matches!(err, ClassifyError::ModelLoad { ref asset, .. } if asset == "rice_model.json"));

        let (c, _) = classifier(MemoryAssets::new().with("rice_model.json", "1.0"));
        let err = c.classify_tensor(&blank(), "rice").unwrap_err();
        assert!(matches!(err, ClassifyError::ModelLoad { ref asset, .. } if asset == "rice_labels.txt"));
    }

    #[test]
    fn every_successful_call_releases_its_engine() {
        let (c, factory) = classifier(crop_assets());
        for _ in 0..5 {
            c.classify_tensor(&blank(), "corn").unwrap();
        }
        assert_eq!(factory.loads.load(Ordering::SeqCst), 5);
        assert_eq!(factory.released.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn concurrent_crops_do_not_mix_results() {
        let (c, factory) = classifier(crop_assets());
        let t = blank();
        std::thread::scope(|s| {
            let rice = s.spawn(|| (0..20).map(|_| c.classify_tensor(&t, "rice").unwrap()).collect::<Vec<_>>());
            let potato = s.spawn(|| (0..20).map(|_| c.classify_tensor(&t, "potato").unwrap()).collect::<Vec<_>>());
            for r in rice.join().unwrap() {
                assert_eq!((r.crop, r.disease_label.as_str()), (Crop::Rice, "Leaf_smut"));
            }
            for r in potato.join().unwrap() {
                assert_eq!((r.crop, r.disease_label.as_str()), (Crop::Potato, "Potato___Early_blight"));
            }
        });
        assert_eq!(factory.released.load(Ordering::SeqCst), 40);
    }

    /// Serialized single-layer softmax model whose output is decided by `biases`.
    pub(crate) fn dense_model(biases: Vec<f32>) -> Vec<u8> {
        use crate::activation::activation::ActivationFunction;
        use crate::layers::dense::Layer;
        use crate::math::matrix::Matrix;
        use crate::network::network::Network;

        let network = Network {
            layers: vec![Layer {
                weights: Matrix::zeros(TENSOR_LEN, biases.len()),
                biases,
                activation: ActivationFunction::Softmax,
            }],
            metadata: None,
        };
        let mut bytes = Vec::new();
        network.write_json(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn dense_engine_picks_label_and_softmax_confidence() {
        let assets = MemoryAssets::new()
            .with("rice_model.json", dense_model(vec![0.0, 2.0, 0.0]))
            .with("rice_labels.txt", "Bacterial_blight\nBrown_spot\nHealthy\n")
            .with("potato_model.json", dense_model(vec![1.0, 1.0]))
            .with("potato_labels.txt", "Potato___Early_blight\nPotato___healthy\n");
        let c = Classifier::new(Arc::new(assets), Arc::new(DenseEngineFactory));

        let r = c.classify(&png(50, 30), "rice").unwrap();
        let expected = 2f32.exp() / (2f32.exp() + 2.0);
        assert_eq!(r.disease_label, "Brown_spot");
        assert!((r.confidence - expected).abs() < 1e-4, "{}", r.confidence);

        // Equal logits: the first label wins.
        let r = c.classify_tensor(&blank(), "potato").unwrap();
        assert_eq!(r.disease_label, "Potato___Early_blight");
        assert!((r.confidence - 0.5).abs() < 1e-5);
    }

    #[test]
    fn dense_output_wider_than_labels_is_inference_error() {
        let assets = MemoryAssets::new()
            .with("corn_model.json", dense_model(vec![0.0; 4]))
            .with("corn_labels.txt", "Corn_(maize)___Common_rust_\nCorn_(maize)___healthy\n");
        let c = Classifier::new(Arc::new(assets), Arc::new(DenseEngineFactory));
        let err = c.classify_tensor(&blank(), "corn").unwrap_err();
        assert_eq!(err.stage(), Stage::Infer);
    }
}
