//! Correction metric: how far a detected pose diverges from its reference.
//!
//! The metric blends three components:
//!
//! - **Angle**: weighted sum of per-joint angle differences, divided by 180°
//! - **Position**: mean absolute x/y/z difference over all landmarks
//! - **Depth**: mean absolute z difference over all landmarks
//!
//! Visibility never enters any component, so occluded landmarks count the
//! same as visible ones.

use asana_core::{Direction, Error, Joint, LandmarkVector, Result};
use serde::{Deserialize, Serialize};

use crate::angles::{calculate_angles, JointAngleSet};

/// Normalizes weighted degree differences into roughly `[0, 1]`.
pub const MAX_ANGLE_DEGREES: f64 = 180.0;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Relative importance of each joint in the angle component. Sums to 1.0.
///
/// A joint left out of a deserialized table weighs zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointWeights {
    #[serde(default)]
    pub spine: f64,
    #[serde(default)]
    pub left_arm: f64,
    #[serde(default)]
    pub right_arm: f64,
    #[serde(default)]
    pub left_leg: f64,
    #[serde(default)]
    pub right_leg: f64,
}

impl Default for JointWeights {
    fn default() -> Self {
        Self {
            spine: 0.35,
            left_arm: 0.15,
            right_arm: 0.15,
            left_leg: 0.175,
            right_leg: 0.175,
        }
    }
}

impl JointWeights {
    pub fn new(
        spine: f64,
        left_arm: f64,
        right_arm: f64,
        left_leg: f64,
        right_leg: f64,
    ) -> Result<Self> {
        let weights = Self {
            spine,
            left_arm,
            right_arm,
            left_leg,
            right_leg,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn weight(&self, joint: Joint) -> f64 {
        match joint {
            Joint::Spine => self.spine,
            Joint::LeftArm => self.left_arm,
            Joint::RightArm => self.right_arm,
            Joint::LeftLeg => self.left_leg,
            Joint::RightLeg => self.right_leg,
        }
    }

    pub fn total(&self) -> f64 {
        Joint::ALL.iter().map(|&joint| self.weight(joint)).sum()
    }

    /// Weights must be finite, non-negative and sum to 1.0.
    pub fn validate(&self) -> Result<()> {
        for joint in Joint::ALL {
            let weight = self.weight(joint);
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "joint weight for {joint} must be a non-negative number, got {weight}"
                )));
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidInput(format!(
                "joint weights must sum to 1.0, got {total}"
            )));
        }

        Ok(())
    }
}

/// Blend of the three metric components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    pub angle: f64,
    pub position: f64,
    pub depth: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            angle: 0.5,
            position: 0.3,
            depth: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    pub joint_weights: JointWeights,
    pub metric_weights: MetricWeights,
}

impl CorrectionConfig {
    pub fn validate(&self) -> Result<()> {
        self.joint_weights.validate()?;

        let MetricWeights {
            angle,
            position,
            depth,
        } = self.metric_weights;
        if [angle, position, depth]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(Error::InvalidInput(
                "metric weights must be non-negative numbers".to_string(),
            ));
        }

        Ok(())
    }
}

/// Angle deviation of one joint from the reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointDeviation {
    pub joint: Joint,
    /// Absolute difference in degrees
    pub difference: f64,
    pub direction: Direction,
}

impl JointDeviation {
    pub fn between(joint: Joint, detected: f64, reference: f64) -> Self {
        Self {
            joint,
            difference: (detected - reference).abs(),
            direction: Direction::compare(detected, reference),
        }
    }
}

/// Outcome of comparing one detected pose to its reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    /// Combined divergence, `0` for identical poses
    pub metric: f64,
    /// One entry per joint, in canonical joint order
    pub per_joint: Vec<JointDeviation>,
    pub depth_metric: f64,
    pub angle_metric: f64,
    pub position_metric: f64,
}

impl CorrectionResult {
    pub fn deviation(&self, joint: Joint) -> Option<&JointDeviation> {
        self.per_joint.iter().find(|d| d.joint == joint)
    }
}

/// Compares detected and reference landmark vectors.
#[derive(Debug, Clone, Default)]
pub struct CorrectionCalculator {
    config: CorrectionConfig,
}

impl CorrectionCalculator {
    pub fn new(config: CorrectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    pub fn calculate(
        &self,
        detected: &LandmarkVector,
        reference: &LandmarkVector,
    ) -> CorrectionResult {
        let detected_angles = calculate_angles(detected);
        let reference_angles = calculate_angles(reference);

        let per_joint = joint_deviations(&detected_angles, &reference_angles);
        let angle_metric = self.weighted_angle_metric(&per_joint);
        let position_metric = position_metric(detected, reference);
        let depth_metric = depth_metric(detected, reference);

        CorrectionResult {
            metric: self.blend(angle_metric, position_metric, depth_metric),
            per_joint,
            depth_metric,
            angle_metric,
            position_metric,
        }
    }

    /// `Σ weight × difference / 180` over the given deviations
    pub fn weighted_angle_metric(&self, deviations: &[JointDeviation]) -> f64 {
        let weighted: f64 = deviations
            .iter()
            .map(|d| self.config.joint_weights.weight(d.joint) * d.difference)
            .sum();
        weighted / MAX_ANGLE_DEGREES
    }

    pub fn blend(&self, angle_metric: f64, position_metric: f64, depth_metric: f64) -> f64 {
        let w = &self.config.metric_weights;
        w.angle * angle_metric + w.position * position_metric + w.depth * depth_metric
    }
}

/// Compare two poses with the default weights
pub fn calculate_correction_metrics(
    detected: &LandmarkVector,
    reference: &LandmarkVector,
) -> CorrectionResult {
    CorrectionCalculator::default().calculate(detected, reference)
}

pub fn joint_deviations(
    detected: &JointAngleSet,
    reference: &JointAngleSet,
) -> Vec<JointDeviation> {
    Joint::ALL
        .iter()
        .map(|&joint| JointDeviation::between(joint, detected.get(joint), reference.get(joint)))
        .collect()
}

/// Mean absolute x/y/z difference over every landmark.
pub fn position_metric(detected: &LandmarkVector, reference: &LandmarkVector) -> f64 {
    let diffs: Vec<f64> = detected
        .iter()
        .zip(reference.iter())
        .flat_map(|(d, r)| [(d.x - r.x).abs(), (d.y - r.y).abs(), (d.z - r.z).abs()])
        .collect();

    mean(&diffs)
}

/// Mean absolute z difference over every landmark.
pub fn depth_metric(detected: &LandmarkVector, reference: &LandmarkVector) -> f64 {
    let diffs: Vec<f64> = detected
        .iter()
        .zip(reference.iter())
        .map(|(d, r)| (d.z - r.z).abs())
        .collect();

    mean(&diffs)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
