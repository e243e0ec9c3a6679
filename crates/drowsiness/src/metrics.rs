//! Shared drowsiness metrics snapshot

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// One generation of drowsiness indicators.
///
/// Published as a whole record so readers never observe fields from two
/// different generation cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrowsinessMetrics {
    pub is_drowsy: bool,
    pub confidence: f64,
    pub eye_aspect_ratio: f64,
    pub yawn_count: u32,
    pub blink_count: u32,
    /// Milliseconds since epoch; 0 until the first publish
    pub timestamp: i64,
}

/// Handle to the single live metrics record.
///
/// The simulator is the sole writer; any number of readers clone
/// complete snapshots.
#[derive(Clone, Default)]
pub struct SharedMetrics {
    inner: Arc<RwLock<DrowsinessMetrics>>,
}

impl SharedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record atomically with a fresh generation
    pub async fn publish(&self, record: DrowsinessMetrics) {
        *self.inner.write().await = record;
    }

    /// Clone the latest complete record; never blocks on the writer
    /// beyond the lock hand-off.
    pub async fn snapshot(&self) -> DrowsinessMetrics {
        self.inner.read().await.clone()
    }
}
