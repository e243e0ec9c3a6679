//! Opaque detection scorer
//!
//! The gateway is polymorphic over `Scorer` so the pretrained model stays
//! a black box and tests can substitute a canned implementation.

use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use tracing::info;

use crate::DetectionError;

/// One raw candidate from the model, in the model's own ordering.
///
/// `bbox` is normalized `[ymin, xmin, ymax, xmax]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub bbox: [f32; 4],
    pub class_id: u32,
    pub score: f32,
}

/// Capability: score a single-image batch into candidates
pub trait Scorer: Send + Sync {
    fn score(&self, input: &Array4<u8>) -> Result<Vec<Candidate>, DetectionError>;
}

/// ONNX-backed scorer for SSD-style detection models with
/// `detection_boxes` / `detection_classes` / `detection_scores` outputs.
pub struct OnnxScorer {
    session: Session,
}

impl OnnxScorer {
    /// Load the model from disk
    pub fn load(path: &str) -> Result<Self, DetectionError> {
        info!("Loading phone detection model from {}", path);
        let session = Session::builder()
            .map_err(|err| DetectionError::ModelUnavailable(err.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|err| DetectionError::ModelUnavailable(err.to_string()))?
            .commit_from_file(path)
            .map_err(|err| DetectionError::ModelUnavailable(err.to_string()))?;

        Ok(Self { session })
    }
}

impl Scorer for OnnxScorer {
    fn score(&self, input: &Array4<u8>) -> Result<Vec<Candidate>, DetectionError> {
        let inputs = ort::inputs![input.clone()]
            .map_err(|err| DetectionError::Inference(err.to_string()))?;
        let outputs = self
            .session
            .run(inputs)
            .map_err(|err| DetectionError::Inference(err.to_string()))?;

        let boxes = outputs["detection_boxes"]
            .try_extract_tensor::<f32>()
            .map_err(|err| DetectionError::Inference(err.to_string()))?;
        let classes = outputs["detection_classes"]
            .try_extract_tensor::<f32>()
            .map_err(|err| DetectionError::Inference(err.to_string()))?;
        let scores = outputs["detection_scores"]
            .try_extract_tensor::<f32>()
            .map_err(|err| DetectionError::Inference(err.to_string()))?;

        let count = scores.shape().last().copied().unwrap_or(0);
        let mut candidates = Vec::with_capacity(count);
        for i in 0..count {
            candidates.push(Candidate {
                bbox: [
                    boxes[[0, i, 0]],
                    boxes[[0, i, 1]],
                    boxes[[0, i, 2]],
                    boxes[[0, i, 3]],
                ],
                class_id: classes[[0, i]] as u32,
                score: scores[[0, i]],
            });
        }

        Ok(candidates)
    }
}
