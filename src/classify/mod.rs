pub mod classifier;
pub mod top1;

pub use classifier::{ClassificationResult, Classifier};
pub use top1::top1;
