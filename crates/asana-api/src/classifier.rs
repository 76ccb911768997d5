//! Pose classification seam.
//!
//! The pretrained classification model is an external collaborator: it maps a
//! flat landmark vector to a pose label and a confidence. [`PoseClassifier`]
//! is the boundary; [`NearestReferenceClassifier`] is a model-free stand-in
//! that picks the closest reference pose.

use asana_core::{Error, LandmarkVector, PoseReferenceTable, Result};
use asana_correction::CorrectionCalculator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Classifier output for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class_index: usize,
    /// Predicted pose name; may be absent from the reference table
    pub label: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

#[async_trait]
pub trait PoseClassifier: Send + Sync {
    /// Classifier name/identifier
    fn name(&self) -> &str;

    /// Classify a flat `[x, y, z, visibility]*` landmark vector
    async fn classify(&self, landmarks: &[f64]) -> Result<Prediction>;
}

/// Classifies a frame as the reference pose with the lowest correction metric.
///
/// Confidence is a softmax over negated metrics scaled by `temperature`.
pub struct NearestReferenceClassifier {
    references: Arc<PoseReferenceTable>,
    calculator: CorrectionCalculator,
    temperature: f64,
}

impl NearestReferenceClassifier {
    pub fn new(
        references: Arc<PoseReferenceTable>,
        calculator: CorrectionCalculator,
        temperature: f64,
    ) -> Self {
        Self {
            references,
            calculator,
            temperature,
        }
    }

    fn score(&self, detected: &LandmarkVector) -> Result<Prediction> {
        let metrics: Vec<(usize, &str, f64)> = self
            .references
            .iter()
            .enumerate()
            .map(|(index, (name, reference))| {
                let metric = self.calculator.calculate(detected, reference).metric;
                (index, name, metric)
            })
            .collect();

        let &(class_index, label, best) = metrics
            .iter()
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .ok_or_else(|| Error::Classification("reference pose table is empty".to_string()))?;

        if !best.is_finite() {
            return Err(Error::Classification(format!(
                "correction metric is not finite ({best}); landmarks contain non-finite values"
            )));
        }

        // Shift by the best metric so the winning exponent is exp(0) = 1.
        let partition: f64 = metrics
            .iter()
            .map(|&(_, _, metric)| (-(metric - best) / self.temperature).exp())
            .sum();

        Ok(Prediction {
            class_index,
            label: label.to_string(),
            confidence: (1.0 / partition).clamp(0.0, 1.0),
        })
    }
}

#[async_trait]
impl PoseClassifier for NearestReferenceClassifier {
    fn name(&self) -> &str {
        "nearest-reference"
    }

    async fn classify(&self, landmarks: &[f64]) -> Result<Prediction> {
        let detected = LandmarkVector::from_flat(landmarks)
            .map_err(|e| Error::Classification(e.to_string()))?;
        self.score(&detected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asana_core::{Landmark, LandmarkIndex};

    fn uniform(value: f64) -> LandmarkVector {
        LandmarkVector::new([Landmark::new(value, value, value, 1.0); LandmarkIndex::COUNT])
    }

    fn classifier(temperature: f64) -> NearestReferenceClassifier {
        let table = PoseReferenceTable::from_samples(vec![
            ("Tadasana", uniform(0.1)),
            ("Utkatasana", uniform(0.5)),
            ("Vrksasana", uniform(0.9)),
        ]);
        NearestReferenceClassifier::new(
            Arc::new(table),
            CorrectionCalculator::default(),
            temperature,
        )
    }

    #[tokio::test]
    async fn test_picks_nearest_reference() {
        let prediction = classifier(0.05)
            .classify(&uniform(0.55).to_flat())
            .await
            .unwrap();

        assert_eq!(prediction.label, "Utkatasana");
        assert_eq!(prediction.class_index, 1);
        assert!(prediction.confidence > 0.5 && prediction.confidence <= 1.0);
    }

    #[tokio::test]
    async fn test_exact_match_with_sharp_temperature() {
        let prediction = classifier(1e-3)
            .classify(&uniform(0.9).to_flat())
            .await
            .unwrap();

        assert_eq!(prediction.label, "Vrksasana");
        assert!((prediction.confidence - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_wrong_landmark_count() {
        let err = classifier(0.05).classify(&[0.0; 40]).await.unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[tokio::test]
    async fn test_non_finite_landmarks() {
        let mut landmarks = uniform(0.5).to_flat();
        landmarks[44] = f64::NAN;
        let err = classifier(0.05).classify(&landmarks).await.unwrap_err();
        assert!(matches!(err, Error::Classification(_)));

        landmarks[44] = f64::INFINITY;
        let err = classifier(0.05).classify(&landmarks).await.unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[tokio::test]
    async fn test_empty_table() {
        let classifier = NearestReferenceClassifier::new(
            Arc::new(PoseReferenceTable::default()),
            CorrectionCalculator::default(),
            0.05,
        );
        let err = classifier.classify(&uniform(0.1).to_flat()).await.unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }
}
