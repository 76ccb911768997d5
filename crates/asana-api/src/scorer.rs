//! Per-frame scoring: classify, compare with the reference, phrase feedback.
//!
//! Every error path produces a well-formed [`FrameResponse`]; a bad frame
//! never stops the frames after it.

use asana_core::{LandmarkVector, PoseReferenceTable};
use asana_correction::{
    normalize_keypoints, CorrectionCalculator, FeedbackGenerator, KeypointRecord,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::classifier::PoseClassifier;

pub const MISSING_KEYPOINTS: &str = "No keypoints provided.";
pub const REFERENCE_UNAVAILABLE: &str = "Reference pose not available for correction.";

/// Incoming frame. Fields other than `keypoints` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FramePayload {
    #[serde(default)]
    pub keypoints: Option<Vec<KeypointRecord>>,
}

/// Classification plus corrective feedback for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub predicted_class: usize,
    pub predicted_pose: String,
    pub confidence: f64,
    pub correction_feedback: String,
}

/// Reply for one frame, serialized either as a result or as `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameResponse {
    Scored(FrameResult),
    Failed { error: String },
}

impl FrameResponse {
    pub fn failed(error: impl Into<String>) -> Self {
        FrameResponse::Failed {
            error: error.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FrameResponse::Failed { .. })
    }
}

/// Stateless frame scorer shared by every connection.
pub struct FrameScorer {
    references: Arc<PoseReferenceTable>,
    classifier: Arc<dyn PoseClassifier>,
    calculator: CorrectionCalculator,
    feedback: FeedbackGenerator,
}

impl FrameScorer {
    pub fn new(
        references: Arc<PoseReferenceTable>,
        classifier: Arc<dyn PoseClassifier>,
        calculator: CorrectionCalculator,
        feedback: FeedbackGenerator,
    ) -> Self {
        Self {
            references,
            classifier,
            calculator,
            feedback,
        }
    }

    pub fn references(&self) -> &PoseReferenceTable {
        &self.references
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Score a raw JSON frame message
    pub async fn score_text(&self, text: &str) -> FrameResponse {
        match serde_json::from_str::<FramePayload>(text) {
            Ok(payload) => self.score_payload(payload).await,
            Err(e) => {
                tracing::warn!("Malformed frame payload: {}", e);
                FrameResponse::failed(format!("Malformed frame payload: {e}"))
            }
        }
    }

    pub async fn score_payload(&self, payload: FramePayload) -> FrameResponse {
        let Some(keypoints) = payload.keypoints else {
            tracing::warn!("Frame without keypoints");
            return FrameResponse::failed(MISSING_KEYPOINTS);
        };

        let landmarks = normalize_keypoints(&keypoints);

        let prediction = match self.classifier.classify(&landmarks).await {
            Ok(prediction) => prediction,
            Err(e) => {
                tracing::warn!("Classification failed: {}", e);
                return FrameResponse::failed(e.to_string());
            }
        };

        let correction_feedback = match self.references.get(&prediction.label) {
            None => {
                tracing::debug!(pose = %prediction.label, "No reference pose for prediction");
                REFERENCE_UNAVAILABLE.to_string()
            }
            Some(reference) => match LandmarkVector::from_flat(&landmarks) {
                Ok(detected) => {
                    let result = self.calculator.calculate(&detected, reference);
                    tracing::debug!(
                        pose = %prediction.label,
                        metric = result.metric,
                        depth = result.depth_metric,
                        "Scored frame"
                    );
                    self.feedback.generate(&result).to_text()
                }
                Err(e) => {
                    tracing::warn!("Cannot compare frame with reference: {}", e);
                    return FrameResponse::failed(e.to_string());
                }
            },
        };

        FrameResponse::Scored(FrameResult {
            predicted_class: prediction.class_index,
            predicted_pose: prediction.label,
            confidence: prediction.confidence,
            correction_feedback,
        })
    }
}
