//! Detection gateway
//!
//! Staged pipeline from raw payload to filtered detections. Each stage
//! fails fast with its own error kind; scorer faults never propagate past
//! the gateway as anything but `DetectionError::Inference`.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::config::PHONE_LABEL;
use crate::scorer::OnnxScorer;
use crate::{decode, DetectionError, DetectorConfig, Scorer};

/// One filtered detection on the wire
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// Normalized `[ymin, xmin, ymax, xmax]`
    pub bbox: [f32; 4],
    pub score: f32,
    #[serde(rename = "class")]
    pub label: String,
}

/// Detection response: surviving candidates in model order plus the
/// capture timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct PhoneDetections {
    pub detections: Vec<Detection>,
    pub timestamp: i64,
}

/// Builds a scorer on demand; called at most once per detect call while
/// the handle is unset.
pub type ScorerLoader =
    Box<dyn Fn() -> Result<Arc<dyn Scorer>, DetectionError> + Send + Sync>;

/// Phone detection gateway with a lazily-loaded model handle.
pub struct PhoneDetector {
    config: DetectorConfig,
    loader: ScorerLoader,
    scorer: Mutex<Option<Arc<dyn Scorer>>>,
}

impl PhoneDetector {
    /// Gateway backed by the ONNX scorer from `config.model_path`
    pub fn new(config: DetectorConfig) -> Self {
        let model_path = config.model_path.clone();
        let loader: ScorerLoader = Box::new(move || {
            let path = model_path.as_deref().ok_or_else(|| {
                DetectionError::ModelUnavailable("no model path configured".to_string())
            })?;
            let scorer = OnnxScorer::load(path)?;
            Ok(Arc::new(scorer) as Arc<dyn Scorer>)
        });
        Self::with_loader(config, loader)
    }

    /// Gateway with a custom loader (tests, alternative backends)
    pub fn with_loader(config: DetectorConfig, loader: ScorerLoader) -> Self {
        Self {
            config,
            loader,
            scorer: Mutex::new(None),
        }
    }

    /// Gateway with an already-loaded scorer
    pub fn with_scorer(config: DetectorConfig, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            config,
            loader: Box::new(|| {
                Err(DetectionError::ModelUnavailable(
                    "scorer was provided at construction".to_string(),
                ))
            }),
            scorer: Mutex::new(Some(scorer)),
        }
    }

    /// Whether the model handle is currently loaded
    pub async fn is_loaded(&self) -> bool {
        self.scorer.lock().await.is_some()
    }

    /// Attempt one model load if the handle is unset.
    ///
    /// A failed load leaves the handle unset so a later call retries; a
    /// successful load is shared by all subsequent calls.
    pub async fn ensure_loaded(&self) -> Result<Arc<dyn Scorer>, DetectionError> {
        let mut slot = self.scorer.lock().await;
        if let Some(scorer) = slot.as_ref() {
            return Ok(scorer.clone());
        }

        match (self.loader)() {
            Ok(scorer) => {
                info!("Phone detection model loaded");
                *slot = Some(scorer.clone());
                Ok(scorer)
            }
            Err(err) => {
                error!("Phone detection model load failed: {}", err);
                Err(err)
            }
        }
    }

    /// Run the full pipeline over a raw image payload.
    pub async fn detect(&self, payload: &str) -> Result<PhoneDetections, DetectionError> {
        let image = decode::decode_payload(payload)?;
        let input =
            decode::to_input_batch(&image, self.config.input_width, self.config.input_height);

        let scorer = self.ensure_loaded().await?;
        let candidates = scorer
            .score(&input)
            .map_err(|err| DetectionError::Inference(err.to_string()))?;

        let detections = candidates
            .into_iter()
            .filter(|candidate| {
                candidate.class_id == self.config.target_class
                    && candidate.score >= self.config.score_threshold
            })
            .map(|candidate| Detection {
                bbox: candidate.bbox,
                score: candidate.score,
                label: PHONE_LABEL.to_string(),
            })
            .collect();

        Ok(PhoneDetections {
            detections,
            timestamp: Utc::now().timestamp_millis(),
        })
    }
}
