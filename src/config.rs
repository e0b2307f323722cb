//! Runtime configuration for the binaries.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_ASSET_DIR: &str = "assets";
pub const DEFAULT_BIND: &str = "127.0.0.1:7878";
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding models, labels and advisory documents.
    pub asset_dir: PathBuf,
    /// Bridge listen address.
    pub bind: String,
    /// Largest request body the bridge will read.
    pub max_body_bytes: usize,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            bind: DEFAULT_BIND.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Create config from `CROPDOC_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary variable source. Unparseable
    /// values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            asset_dir: lookup("CROPDOC_ASSET_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.asset_dir),
            bind: lookup("CROPDOC_BIND")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.bind),
            max_body_bytes: lookup("CROPDOC_MAX_BODY_BYTES")
                .and_then(|s| s.trim().parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_body_bytes),
            log_filter: lookup("CROPDOC_LOG")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.log_filter),
        }
    }
}

/// Installs the global `fmt` subscriber. `RUST_LOG` wins over `fallback`.
pub fn init_tracing(fallback: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(|_| None), AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("CROPDOC_ASSET_DIR", "/opt/cropdoc"),
            ("CROPDOC_BIND", "0.0.0.0:9000"),
            ("CROPDOC_MAX_BODY_BYTES", "1024"),
            ("CROPDOC_LOG", "cropdoc=debug"),
        ]));
        assert_eq!(cfg.asset_dir, PathBuf::from("/opt/cropdoc"));
        assert_eq!(cfg.bind, "0.0.0.0:9000");
        assert_eq!(cfg.max_body_bytes, 1024);
        assert_eq!(cfg.log_filter, "cropdoc=debug");
    }

    #[test]
    fn bad_numbers_fall_back() {
        for raw in ["lots", "0", "-5"] {
            let cfg = AppConfig::from_lookup(lookup(&[("CROPDOC_MAX_BODY_BYTES", raw)]));
            assert_eq!(cfg.max_body_bytes, DEFAULT_MAX_BODY_BYTES, "{raw}");
        }
    }
}
