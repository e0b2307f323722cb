pub mod provider;

pub use provider::{AssetProvider, DirAssets, MemoryAssets};
