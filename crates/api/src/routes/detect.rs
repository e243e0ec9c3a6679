//! Phone detection route

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::AppState;

/// Request body for `/api/detect-phone`
#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    #[serde(rename = "imageData")]
    pub image_data: Option<String>,
}

/// Error body shared by the 4xx/5xx paths
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Run phone detection over an uploaded frame.
///
/// Client input faults map to 400, model/inference faults to 500; no
/// detection error escapes as anything but a typed JSON response.
pub async fn detect_phone(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<DetectRequest>>,
) -> Response {
    let image_data = match payload {
        Some(Json(DetectRequest {
            image_data: Some(data),
        })) => data,
        _ => return bad_request("No image data provided"),
    };

    match state.detector.detect(&image_data).await {
        Ok(result) => Json(result).into_response(),
        Err(err) if err.is_client_fault() => {
            warn!("Rejected detection payload: {}", err);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!("Phone detection failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}
