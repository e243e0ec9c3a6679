//! Phone Detection Gateway
//!
//! Converts a raw uploaded image payload into filtered object-detection
//! results via an opaque scorer:
//! - base64/data-URL decoding
//! - RGB normalization and resize to the model input resolution
//! - lazily-loaded ONNX scorer behind a swappable capability trait
//! - class/score filtering with the model's ordering preserved

pub mod config;
pub mod decode;
pub mod gateway;
pub mod scorer;

pub use config::DetectorConfig;
pub use gateway::{Detection, PhoneDetections, PhoneDetector};
pub use scorer::{Candidate, OnnxScorer, Scorer};

use thiserror::Error;

/// Detection error types
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Invalid image encoding: {0}")]
    BadEncoding(String),

    #[error("Unsupported image data: {0}")]
    UnsupportedImage(String),

    #[error("Detection model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl DetectionError {
    /// Client input faults map to 4xx at the HTTP boundary; the rest are
    /// server faults.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            DetectionError::BadEncoding(_) | DetectionError::UnsupportedImage(_)
        )
    }
}
