//! Shared frame cache
//!
//! One mutex guards the camera handle and the most-recent frame.
//! check-then-capture-then-store runs as a single critical section so two
//! concurrent readers cannot both issue a capture and race on the stored
//! result. The backoff sleep between failed captures happens with the
//! lock released.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{CameraConfig, CameraError, CameraProvider, VideoFrame};

/// Capture retries before reporting the camera unavailable
const CAPTURE_ATTEMPTS: u32 = 5;

/// Pause between failed captures
const CAPTURE_BACKOFF: Duration = Duration::from_millis(100);

struct CacheInner {
    device: Option<Box<dyn crate::CameraDevice>>,
    frame: Option<VideoFrame>,
}

/// Owns the camera device and the single most-recent decoded frame.
pub struct FrameCache {
    config: CameraConfig,
    provider: Box<dyn CameraProvider>,
    inner: Mutex<CacheInner>,
}

impl FrameCache {
    /// Create a cache; the device is acquired lazily on first read.
    pub fn new(config: CameraConfig, provider: Box<dyn CameraProvider>) -> Self {
        Self {
            config,
            provider,
            inner: Mutex::new(CacheInner {
                device: None,
                frame: None,
            }),
        }
    }

    /// Return a defensive copy of the current frame, capturing one if the
    /// cache is empty.
    ///
    /// Device acquisition happens at most once per call and is not
    /// retried on failure. Failed captures back off briefly (lock
    /// released) and retry up to a fixed cap.
    pub async fn read_frame(&self) -> Result<VideoFrame, CameraError> {
        for attempt in 1..=CAPTURE_ATTEMPTS {
            {
                let mut inner = self.inner.lock().await;

                if let Some(frame) = &inner.frame {
                    return Ok(frame.clone());
                }

                if inner.device.is_none() {
                    match self.provider.open(&self.config) {
                        Ok(device) => {
                            debug!("Camera {} acquired", self.config.device);
                            inner.device = Some(device);
                        }
                        Err(err) => {
                            warn!("Failed to open camera {}: {}", self.config.device, err);
                            return Err(err);
                        }
                    }
                }

                if let Some(device) = inner.device.as_mut() {
                    match device.capture() {
                        Ok(frame) => {
                            inner.frame = Some(frame.clone());
                            return Ok(frame);
                        }
                        Err(err) => {
                            warn!("Capture attempt {}/{} failed: {}", attempt, CAPTURE_ATTEMPTS, err);
                        }
                    }
                }
            }

            if attempt < CAPTURE_ATTEMPTS {
                tokio::time::sleep(CAPTURE_BACKOFF).await;
            }
        }

        Err(CameraError::Unavailable(format!(
            "no frame after {} capture attempts",
            CAPTURE_ATTEMPTS
        )))
    }

    /// Drop the device handle if one is held.
    ///
    /// Safe to call with no device acquired; the next read re-acquires
    /// lazily. The cached frame is kept.
    pub async fn release_camera(&self) {
        let mut inner = self.inner.lock().await;
        if inner.device.take().is_some() {
            debug!("Camera {} released", self.config.device);
        }
    }

    /// Whether a device handle is currently held
    pub async fn is_camera_held(&self) -> bool {
        self.inner.lock().await.device.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CameraDevice;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingDevice {
        captures: Arc<AtomicUsize>,
        fail_first: usize,
    }

    impl CameraDevice for CountingDevice {
        fn capture(&mut self) -> Result<VideoFrame, CameraError> {
            let n = self.captures.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                return Err(CameraError::Capture("transient read failure".into()));
            }
            Ok(VideoFrame::new(vec![0; 2 * 2 * 3], 2, 2, 0, n as u64))
        }
    }

    struct CountingProvider {
        opens: Arc<AtomicUsize>,
        captures: Arc<AtomicUsize>,
        fail_first: usize,
        refuse_open: bool,
    }

    impl CameraProvider for CountingProvider {
        fn open(&self, _config: &CameraConfig) -> Result<Box<dyn CameraDevice>, CameraError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if self.refuse_open {
                return Err(CameraError::Unavailable("device busy".into()));
            }
            Ok(Box::new(CountingDevice {
                captures: self.captures.clone(),
                fail_first: self.fail_first,
            }))
        }
    }

    fn cache_with(fail_first: usize, refuse_open: bool) -> (FrameCache, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let opens = Arc::new(AtomicUsize::new(0));
        let captures = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            opens: opens.clone(),
            captures: captures.clone(),
            fail_first,
            refuse_open,
        };
        (
            FrameCache::new(CameraConfig::default(), Box::new(provider)),
            opens,
            captures,
        )
    }

    #[tokio::test]
    async fn open_failure_is_not_retried_within_call() {
        let (cache, opens, _) = cache_with(0, true);

        let err = cache.read_frame().await.unwrap_err();
        assert!(matches!(err, CameraError::Unavailable(_)));
        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert!(!cache.is_camera_held().await);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_capture_failure_recovers_with_backoff() {
        let (cache, _, captures) = cache_with(1, false);

        let frame = cache.read_frame().await.unwrap();
        assert_eq!(frame.width, 2);
        // One failed capture plus the successful retry.
        assert_eq!(captures.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn capture_exhaustion_reports_unavailable() {
        let (cache, _, captures) = cache_with(usize::MAX, false);

        let err = cache.read_frame().await.unwrap_err();
        assert!(matches!(err, CameraError::Unavailable(_)));
        assert_eq!(captures.load(Ordering::SeqCst), CAPTURE_ATTEMPTS as usize);
    }

    #[tokio::test]
    async fn cached_frame_is_served_without_new_capture() {
        let (cache, _, captures) = cache_with(0, false);

        cache.read_frame().await.unwrap();
        cache.read_frame().await.unwrap();
        assert_eq!(captures.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn returned_frame_is_a_defensive_copy() {
        let (cache, _, _) = cache_with(0, false);

        let mut first = cache.read_frame().await.unwrap();
        first.data[0] = 255;

        let second = cache.read_frame().await.unwrap();
        assert_eq!(second.data[0], 0);
    }

    #[tokio::test]
    async fn release_then_read_reacquires_device() {
        let (cache, opens, _) = cache_with(0, false);

        cache.read_frame().await.unwrap();
        assert!(cache.is_camera_held().await);

        cache.release_camera().await;
        assert!(!cache.is_camera_held().await);
        // Idempotent with no device held.
        cache.release_camera().await;

        cache.read_frame().await.unwrap();
        assert_eq!(opens.load(Ordering::SeqCst), 2);
    }
}
