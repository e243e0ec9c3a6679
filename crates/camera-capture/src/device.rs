//! Camera device seam
//!
//! The cache talks to hardware through `CameraProvider`/`CameraDevice` so
//! a real V4L2 driver, an RTSP decoder, or a test double can sit behind
//! the same contract. The built-in backend renders a synthetic test
//! pattern for deployments without a physical camera.

use crate::{CameraConfig, CameraError, VideoFrame};

/// An acquired camera handle that can produce frames.
///
/// `capture` blocks for at most one frame interval; implementations
/// report device loss as `CameraError::Capture` so the cache can back
/// off and retry.
pub trait CameraDevice: Send {
    fn capture(&mut self) -> Result<VideoFrame, CameraError>;
}

/// Opens camera devices on demand.
///
/// Acquisition is not reentrant: the cache calls `open` at most once per
/// lazy-init and holds the returned device until it is released.
pub trait CameraProvider: Send + Sync {
    fn open(&self, config: &CameraConfig) -> Result<Box<dyn CameraDevice>, CameraError>;
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Synthetic camera rendering a moving gradient test pattern.
///
/// Stands in for cabin hardware on development machines, the same way the
/// detection models fall back to a stub backend when no model file is
/// configured.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    sequence: u64,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sequence: 0,
        }
    }
}

impl CameraDevice for SyntheticCamera {
    fn capture(&mut self) -> Result<VideoFrame, CameraError> {
        let mut data = Vec::with_capacity((self.width * self.height * 3) as usize);
        let phase = (self.sequence % 256) as u8;
        for y in 0..self.height {
            for x in 0..self.width {
                let r = ((x * 255) / self.width.max(1)) as u8;
                let g = ((y * 255) / self.height.max(1)) as u8;
                data.push(r.wrapping_add(phase));
                data.push(g);
                data.push(phase);
            }
        }

        let frame = VideoFrame::new(data, self.width, self.height, now_ms(), self.sequence);
        self.sequence += 1;
        Ok(frame)
    }
}

/// Provider for the synthetic backend
pub struct SyntheticProvider;

impl CameraProvider for SyntheticProvider {
    fn open(&self, config: &CameraConfig) -> Result<Box<dyn CameraDevice>, CameraError> {
        Ok(Box::new(SyntheticCamera::new(config.width, config.height)))
    }
}
