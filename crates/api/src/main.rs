//! Drowsiness Monitoring Backend - Main Entry Point

use std::sync::Arc;

use api::{init_logging, run_server, AppState};
use camera_capture::CameraConfig;
use detection::DetectorConfig;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== DriveGuard Drowsiness Backend v{} ===", env!("CARGO_PKG_VERSION"));

    let mut detector_config = DetectorConfig::default();
    if let Ok(path) = std::env::var("PHONE_MODEL_PATH") {
        detector_config.model_path = Some(path);
    }

    let state = Arc::new(AppState::new(CameraConfig::default(), detector_config));

    // Eager load attempt; failure is non-fatal and leaves lazy retry in
    // place for later detect calls.
    if let Err(err) = state.detector.ensure_loaded().await {
        warn!("Phone detection model not loaded at startup: {}", err);
    }

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
    run_server(&addr, state).await?;

    Ok(())
}
