//! Liveness and model status routes

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Liveness response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// Model readiness response
#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    pub status: String,
    #[serde(rename = "modelLoaded")]
    pub model_loaded: bool,
}

/// Check if the server is online
pub async fn server_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Check if the API is online
pub async fn api_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
        message: "API is running".to_string(),
    })
}

/// Report whether the phone detection model is loaded
pub async fn detection_status(State(state): State<Arc<AppState>>) -> Json<ModelStatusResponse> {
    Json(ModelStatusResponse {
        status: "ok".to_string(),
        model_loaded: state.detector.is_loaded().await,
    })
}

/// Health probe, same shape as the detection status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ModelStatusResponse> {
    Json(ModelStatusResponse {
        status: "ok".to_string(),
        model_loaded: state.detector.is_loaded().await,
    })
}
