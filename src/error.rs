use std::fmt;

use thiserror::Error;

/// Pipeline stage a classification failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Load,
    Infer,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Decode => "decode",
            Stage::Load   => "load",
            Stage::Infer  => "infer",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything that can abort a `classify` call.
///
/// None of these are retried; the caller gets exactly one of them or a
/// complete `ClassificationResult`.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The input bytes are not a raster image we can read.
    #[error("could not read image: {0}")]
    Decode(String),

    /// Model or label asset is missing, empty or malformed.
    #[error("could not load {asset}: {reason}")]
    ModelLoad { asset: String, reason: String },

    /// Shape mismatch, engine failure, or a non-finite probability.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl ClassifyError {
    pub fn decode(msg: impl Into<String>) -> Self {
        ClassifyError::Decode(msg.into())
    }

    pub fn model_load(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        ClassifyError::ModelLoad { asset: asset.into(), reason: reason.into() }
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        ClassifyError::Inference(msg.into())
    }

    pub fn stage(&self) -> Stage {
        match self {
            ClassifyError::Decode(_)         => Stage::Decode,
            ClassifyError::ModelLoad { .. }  => Stage::Load,
            ClassifyError::Inference(_)      => Stage::Infer,
        }
    }
}

/// Failure to fetch a named asset from an `AssetProvider`.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset '{0}' not found")]
    NotFound(String),

    #[error("invalid asset name '{0}'")]
    InvalidName(String),

    #[error("I/O error reading asset '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// A malformed or unreadable advisory document.
///
/// Absorbed at startup: the affected language falls back to an empty
/// mapping, it never reaches a caller of `resolve`.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected document shape at {path}: {reason}")]
    Shape { path: String, reason: String },
}

impl CatalogLoadError {
    pub fn shape(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogLoadError::Shape { path: path.into(), reason: reason.into() }
    }
}
