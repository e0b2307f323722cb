use serde::Serialize;

const GENERIC_CAUSE: &str = "Fungal/bacterial infection due to weather conditions.";
const GENERIC_CURE: &str = "Apply appropriate fungicide/pesticide. Remove infected leaves.";
const GENERIC_SUGGESTIONS: &str = "Maintain proper spacing. Water in morning. Rotate crops.";

/// Cause, cure and suggestions for one crop/disease pair.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AdvisoryRecord {
    pub cause: String,
    pub cure: String,
    pub suggestions: String,
}

impl AdvisoryRecord {
    pub fn new(cause: impl Into<String>, cure: impl Into<String>, suggestions: impl Into<String>) -> Self {
        AdvisoryRecord { cause: cause.into(), cure: cure.into(), suggestions: suggestions.into() }
    }

    /// Crop- and disease-agnostic advice, used when the catalog has nothing
    /// for the crop.
    pub fn generic() -> Self {
        AdvisoryRecord::new(GENERIC_CAUSE, GENERIC_CURE, GENERIC_SUGGESTIONS)
    }
}
