use serde::{Deserialize, Serialize};

/// Describes how to interpret the input fed to a Network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputType {
    /// RGB image resized to width×height, normalized to [-1, 1], flattened
    /// as R,G,B per pixel.
    ImageRgb { width: u32, height: u32 },
}

/// Optional annotations stored alongside the weights.
/// Every field is optional so bare weight files still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    pub input_type: Option<InputType>,
}
