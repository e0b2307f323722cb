//! Untrained models and label files for every crop, for exercising the
//! pipeline before trained weights are available.

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::activation::activation::ActivationFunction;
use crate::math::tensor::{INPUT_SIZE, TENSOR_LEN};
use crate::network::metadata::{InputType, ModelMetadata};
use crate::network::network::Network;
use crate::registry::crop::{Crop, CropModelRegistry};
use crate::registry::labels::LabelSet;

/// PlantVillage class names for each crop, in model output order.
pub fn scaffold_labels(crop: Crop) -> LabelSet {
    let names: &[&str] = match crop {
        Crop::Corn => &[
            "Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot",
            "Corn_(maize)___Common_rust_",
            "Corn_(maize)___Northern_Leaf_Blight",
            "Corn_(maize)___healthy",
        ],
        Crop::Potato => &["Potato___Early_blight", "Potato___Late_blight", "Potato___healthy"],
        Crop::Rice => &["Bacterial_blight", "Brown_spot", "Leaf_smut", "Healthy"],
        Crop::Tomato => &[
            "Tomato___Bacterial_spot",
            "Tomato___Early_blight",
            "Tomato___Late_blight",
            "Tomato___Leaf_Mold",
            "Tomato___Septoria_leaf_spot",
            "Tomato___Spider_mites Two-spotted_spider_mite",
            "Tomato___Target_Spot",
            "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
            "Tomato___Tomato_mosaic_virus",
            "Tomato___healthy",
        ],
    };
    LabelSet::from_labels(names.iter().copied())
}

/// Randomly initialised `224·224·3 → hidden (ReLU) → classes (Softmax)`.
pub fn scaffold_network(crop: Crop, hidden: usize, classes: usize) -> Network {
    let mut network = Network::new(vec![
        (hidden, TENSOR_LEN, ActivationFunction::ReLU),
        (classes, hidden, ActivationFunction::Softmax),
    ]);
    network.metadata = Some(ModelMetadata {
        description: Some(format!("untrained {} scaffold", crop.id())),
        input_type: Some(InputType::ImageRgb { width: INPUT_SIZE, height: INPUT_SIZE }),
    });
    network
}

/// Writes `<crop>_model.json` and `<crop>_labels.txt` for every crop into
/// `out`, creating it if needed.
pub fn write_scaffold(out: &Path, hidden: usize) -> io::Result<()> {
    if hidden == 0 {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "hidden layer width must be at least 1"));
    }
    fs::create_dir_all(out)?;
    let registry = CropModelRegistry::new();

    for crop in Crop::ALL {
        let profile = registry.profile(crop);
        let labels = scaffold_labels(crop);
        scaffold_network(crop, hidden, labels.len()).save_json(&out.join(profile.model.name()))?;
        fs::write(out.join(profile.labels.name()), labels.to_text())?;
        info!(crop = crop.id(), classes = labels.len(), hidden, "scaffold written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::provider::DirAssets;
    use crate::diagnosis::{DiagnosisResponse, DiagnosisService};
    use crate::engine::dense::DenseEngineFactory;
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::Arc;

    fn png() -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, 90])))
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn zero_width_hidden_layer_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_scaffold(dir.path(), 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn written_scaffold_classifies_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_scaffold(dir.path(), 2).unwrap();
        for name in ["corn_model.json", "potato_labels.txt", "rice_model.json", "tomato_labels.txt"] {
            assert!(dir.path().join(name).is_file(), "{name}");
        }

        let service = DiagnosisService::from_assets(
            Arc::new(DirAssets::new(dir.path())),
            Arc::new(DenseEngineFactory),
        );
        for (requested, resolved) in [("rice", Crop::Rice), ("maize", Crop::Corn), ("wheat", Crop::Tomato)] {
            let DiagnosisResponse::Success(report) = service.diagnose(&png(), requested, "en") else {
                panic!("{requested}: expected a diagnosis");
            };
            assert_eq!(report.crop, resolved.id());
            assert!(scaffold_labels(resolved).iter().any(|l| l == report.disease), "{}", report.disease);
            assert!(report.confidence_percent <= 100);
            // No advisory documents were written.
            assert_eq!(report.advice_cause, "Fungal/bacterial infection due to weather conditions.");
        }
    }
}
