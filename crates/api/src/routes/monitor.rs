//! Monitoring lifecycle and metrics routes

use axum::{extract::State, Json};
use std::sync::Arc;

use drowsiness::{ControlOutcome, DrowsinessMetrics};

use crate::AppState;

/// Start the drowsiness metrics loop
pub async fn start_detection(State(state): State<Arc<AppState>>) -> Json<ControlOutcome> {
    Json(state.monitor.start().await)
}

/// Stop the metrics loop and release the camera
pub async fn stop_detection(State(state): State<Arc<AppState>>) -> Json<ControlOutcome> {
    Json(state.monitor.stop().await)
}

/// Latest drowsiness metrics snapshot
pub async fn drowsiness_data(State(state): State<Arc<AppState>>) -> Json<DrowsinessMetrics> {
    Json(state.monitor.read_metrics().await)
}
