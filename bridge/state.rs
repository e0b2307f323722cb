use std::sync::Arc;

use cropdoc::{AppConfig, DenseEngineFactory, DiagnosisService, DirAssets};

/// Everything a request handler can see. Built once at startup and never
/// mutated, so handlers share it without locking.
pub struct BridgeState {
    pub service: DiagnosisService,
    pub max_body_bytes: usize,
}

impl BridgeState {
    pub fn new(config: &AppConfig) -> Self {
        let assets = Arc::new(DirAssets::new(&config.asset_dir));
        BridgeState {
            service: DiagnosisService::from_assets(assets, Arc::new(DenseEngineFactory)),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

pub type SharedState = Arc<BridgeState>;
