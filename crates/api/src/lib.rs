//! Drowsiness Monitoring API Server
//!
//! REST + MJPEG streaming server for the monitoring dashboard. All
//! runtime state lives in one explicitly-constructed [`AppState`]
//! context shared by the handlers; the components inside it synchronize
//! themselves.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use camera_capture::{CameraConfig, FrameCache, SyntheticProvider};
use detection::{DetectorConfig, PhoneDetector};
use drowsiness::MonitorService;

pub mod rate_limit;
mod routes;

/// Application state shared across handlers
pub struct AppState {
    /// Camera handle + most-recent frame
    pub camera: Arc<FrameCache>,
    /// Metrics loop lifecycle controller
    pub monitor: Arc<MonitorService>,
    /// Phone detection gateway
    pub detector: Arc<PhoneDetector>,
}

impl AppState {
    /// Build the service context; the camera and the detection model are
    /// both acquired lazily on first use.
    pub fn new(camera_config: CameraConfig, detector_config: DetectorConfig) -> Self {
        let camera = Arc::new(FrameCache::new(camera_config, Box::new(SyntheticProvider)));
        let monitor = Arc::new(MonitorService::new(camera.clone()));
        let detector = Arc::new(PhoneDetector::new(detector_config));
        Self {
            camera,
            monitor,
            detector,
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(routes::status::server_status))
        .route("/api/status", get(routes::status::api_status))
        .route(
            "/api/start-drowsiness-detection",
            get(routes::monitor::start_detection),
        )
        .route(
            "/api/stop-drowsiness-detection",
            get(routes::monitor::stop_detection),
        )
        .route("/api/drowsiness-data", get(routes::monitor::drowsiness_data))
        .route("/video_feed", get(routes::stream::video_feed))
        .route("/api/detect-phone", post(routes::detect::detect_phone))
        .route(
            "/api/phone-detection-status",
            get(routes::status::detection_status),
        )
        .route("/api/health", get(routes::status::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(
    addr: &str,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let governor = rate_limit::create_governor_config(&rate_limit::RateLimitConfig::default());
    let app = create_router(state).layer(GovernorLayer { config: governor });

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
