//! The request/response boundary: image + crop + language in, one JSON-ready
//! payload out. Nothing here returns `Err`; every failure becomes a
//! `{ "success": false, "error": ... }` payload.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use tracing::{error, info};

use crate::advisory::catalog::AdvisoryCatalog;
use crate::advisory::resolver::AdvisoryResolver;
use crate::assets::provider::AssetProvider;
use crate::classify::classifier::{ClassificationResult, Classifier};
use crate::engine::engine::EngineFactory;
use crate::error::ClassifyError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisReport {
    pub success: bool,
    /// Resolved crop id, e.g. `corn` for a `maize` request.
    pub crop: String,
    pub disease: String,
    pub confidence_percent: u8,
    pub advice_cause: String,
    pub advice_cure: String,
    pub advice_suggestions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisFailure {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DiagnosisResponse {
    Success(DiagnosisReport),
    Failure(DiagnosisFailure),
}

impl DiagnosisResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        DiagnosisResponse::Failure(DiagnosisFailure { success: false, error: error.into() })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DiagnosisResponse::Success(_))
    }
}

/// Nearest whole percent of a `[0, 1]` confidence.
pub fn confidence_percent(confidence: f32) -> u8 {
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Strips an optional `data:<mime>;base64,` header and any whitespace,
/// then decodes.
pub fn decode_base64_image(payload: &str) -> Result<Vec<u8>, ClassifyError> {
    let body = match payload.trim_start().strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| ClassifyError::decode("data URL has no payload"))?,
        None => payload,
    };
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(ClassifyError::decode("image payload is empty"));
    }
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ClassifyError::decode(format!("invalid base64 image: {}", e)))
}

/// Classifier plus advisory lookup. Read-only after construction; share it
/// behind an `Arc`.
pub struct DiagnosisService {
    classifier: Classifier,
    resolver: AdvisoryResolver,
}

impl DiagnosisService {
    pub fn new(classifier: Classifier, resolver: AdvisoryResolver) -> Self {
        DiagnosisService { classifier, resolver }
    }

    /// Loads every advisory language from `assets` and classifies with
    /// models from the same provider.
    pub fn from_assets(assets: Arc<dyn AssetProvider>, factory: Arc<dyn EngineFactory>) -> Self {
        let catalog = AdvisoryCatalog::load(assets.as_ref());
        DiagnosisService::new(
            Classifier::new(assets, factory),
            AdvisoryResolver::new(Arc::new(catalog)),
        )
    }

    pub fn diagnose(&self, image: &[u8], crop_id: &str, language: &str) -> DiagnosisResponse {
        match self.classifier.classify(image, crop_id) {
            Ok(result) => self.report(result, language),
            Err(e) => fail(e),
        }
    }

    pub fn diagnose_base64(&self, payload: &str, crop_id: &str, language: &str) -> DiagnosisResponse {
        match decode_base64_image(payload) {
            Ok(bytes) => self.diagnose(&bytes, crop_id, language),
            Err(e) => fail(e),
        }
    }

    fn report(&self, result: ClassificationResult, language: &str) -> DiagnosisResponse {
        let advice = self.resolver.resolve(result.crop_id(), &result.disease_label, language);
        let percent = confidence_percent(result.confidence);
        info!(crop = result.crop_id(), disease = %result.disease_label, percent, tier = ?advice.tier, "diagnosis ready");

        DiagnosisResponse::Success(DiagnosisReport {
            success: true,
            crop: result.crop_id().to_owned(),
            disease: result.disease_label,
            confidence_percent: percent,
            advice_cause: advice.record.cause,
            advice_cure: advice.record.cure,
            advice_suggestions: advice.record.suggestions,
        })
    }
}

fn fail(e: ClassifyError) -> DiagnosisResponse {
    error!(stage = %e.stage(), error = %e, "diagnosis failed");
    DiagnosisResponse::failure(e.to_string())
}
