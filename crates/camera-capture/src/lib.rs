//! Camera Capture for the Drowsiness Monitor
//!
//! Owns the camera device behind a provider seam and caches the single
//! most-recent decoded frame under a lock so any number of stream
//! consumers share one capture instead of contending for the device.
//! Also provides the MJPEG leaf pieces: status annotation, JPEG encoding,
//! and multipart segment framing.

pub mod cache;
pub mod device;
pub mod encoder;
pub mod frame;

pub use cache::FrameCache;
pub use device::{CameraDevice, CameraProvider, SyntheticCamera, SyntheticProvider};
pub use frame::VideoFrame;

use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Frame encoding failed: {0}")]
    Encode(String),
}

/// Camera configuration
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Device identifier (e.g., "/dev/video0")
    pub device: String,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}
