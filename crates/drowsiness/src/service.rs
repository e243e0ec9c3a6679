//! Monitoring lifecycle controller
//!
//! State machine `Stopped --start--> Running --stop--> Stopped`. The
//! controller owns the simulator task handle; the loop polls the run
//! flag once per interval, so stop is eventual (within one interval),
//! never a synchronous join.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use camera_capture::FrameCache;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::metrics::SharedMetrics;
use crate::simulator::{self, SIMULATION_INTERVAL};
use crate::DrowsinessMetrics;

/// Result of a start/stop request.
///
/// Idempotency violations are reported here, not as errors: starting a
/// running service fails softly, stopping a stopped one succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct ControlOutcome {
    pub success: bool,
    pub message: String,
}

/// Owns the run flag, the simulator task, and camera teardown.
pub struct MonitorService {
    running: Arc<AtomicBool>,
    metrics: SharedMetrics,
    camera: Arc<FrameCache>,
    task: Mutex<Option<JoinHandle<()>>>,
    interval: Duration,
}

impl MonitorService {
    pub fn new(camera: Arc<FrameCache>) -> Self {
        Self::with_interval(camera, SIMULATION_INTERVAL)
    }

    /// Controller with a custom publish interval (tests use a short one)
    pub fn with_interval(camera: Arc<FrameCache>, interval: Duration) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            metrics: SharedMetrics::new(),
            camera,
            task: Mutex::new(None),
            interval,
        }
    }

    /// Flip to Running and spawn the simulator loop.
    ///
    /// A second start while Running is a no-op with a failure report and
    /// spawns nothing.
    pub async fn start(&self) -> ControlOutcome {
        if self.running.swap(true, Ordering::SeqCst) {
            return ControlOutcome {
                success: false,
                message: "Detection already running".to_string(),
            };
        }

        let running = self.running.clone();
        let metrics = self.metrics.clone();
        let interval = self.interval;
        let handle = tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            while running.load(Ordering::SeqCst) {
                metrics.publish(simulator::sample(&mut rng)).await;
                tokio::time::sleep(interval).await;
            }
            debug!("Simulator loop exited");
        });

        *self.task.lock().await = Some(handle);
        info!("Drowsiness detection started");
        ControlOutcome {
            success: true,
            message: "Drowsiness detection started".to_string(),
        }
    }

    /// Flip to Stopped and release the camera.
    ///
    /// Always succeeds; the loop observes the flag within one interval.
    /// The camera release tolerates no device being held.
    pub async fn stop(&self) -> ControlOutcome {
        let was_running = self.running.swap(false, Ordering::SeqCst);
        self.task.lock().await.take();
        self.camera.release_camera().await;

        if was_running {
            info!("Drowsiness detection stopped");
        }
        ControlOutcome {
            success: true,
            message: "Drowsiness detection stopped".to_string(),
        }
    }

    /// Latest published record; complete even before the first start.
    pub async fn read_metrics(&self) -> DrowsinessMetrics {
        self.metrics.snapshot().await
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
