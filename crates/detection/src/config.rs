//! Detector configuration

use serde::{Deserialize, Serialize};

/// COCO class id for "cell phone"
pub const COCO_CELL_PHONE: u32 = 77;

/// Label attached to surviving candidates
pub const PHONE_LABEL: &str = "cell phone";

/// Phone detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Path to the ONNX detection model; `None` leaves the gateway
    /// unloadable until one is configured
    pub model_path: Option<String>,

    /// Model input width
    pub input_width: u32,

    /// Model input height
    pub input_height: u32,

    /// Minimum score for a candidate to survive filtering
    pub score_threshold: f32,

    /// Class id candidates must match
    pub target_class: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            input_width: 640,
            input_height: 480,
            score_threshold: 0.5,
            target_class: COCO_CELL_PHONE,
        }
    }
}

impl DetectorConfig {
    /// Config pointing at a model file
    pub fn with_model(path: impl Into<String>) -> Self {
        Self {
            model_path: Some(path.into()),
            ..Default::default()
        }
    }
}
