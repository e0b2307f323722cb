/// cropdoc bridge
///
/// Serves the diagnosis boundary over HTTP for a web-view or any other
/// client. Synchronous tiny_http server, one thread per request.
///
/// Run with:
///   cargo run --bin bridge --release
///
/// Routes:
///   GET  /ping             connectivity check
///   GET  /crops            supported crops
///   GET  /languages        supported advisory languages
///   POST /classify         JSON body with a base64 image
///   POST /classify/upload  multipart form with an image file

mod state;
mod routes;
mod handlers;
mod util;

use std::sync::Arc;

use anyhow::anyhow;
use tiny_http::Server;
use tracing::info;

use cropdoc::config::{init_tracing, AppConfig};
use state::BridgeState;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config.log_filter);

    let server = Server::http(config.bind.as_str())
        .map_err(|e| anyhow!("could not bind {}: {}", config.bind, e))?;
    let shared_state = Arc::new(BridgeState::new(&config));

    info!(
        bind = %config.bind,
        assets = %config.asset_dir.display(),
        max_body_bytes = config.max_body_bytes,
        "bridge listening"
    );

    // Classification blocks for model load plus inference, so every
    // request gets its own thread.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    Ok(())
}
