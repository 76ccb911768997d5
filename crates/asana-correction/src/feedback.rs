//! Corrective feedback generation.
//!
//! Feedback is an ordered list of lines:
//!
//! 1. Exactly one overall tier line, chosen from the correction metric
//! 2. One line per joint whose angle difference exceeds the joint threshold,
//!    in canonical joint order
//! 3. A depth reminder when the depth metric is too large

use asana_core::{Direction, Joint};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metrics::{CorrectionResult, JointDeviation};

/// Overall assessment, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallTier {
    Perfect,
    VeryGood,
    Good,
    OnTrack,
    Basic,
}

impl OverallTier {
    pub fn message(&self) -> &'static str {
        match self {
            OverallTier::Perfect => "Perfect form! Keep holding this position.",
            OverallTier::VeryGood => "Very good form with minimal adjustments needed.",
            OverallTier::Good => "Good effort! Some adjustments will help perfect your pose.",
            OverallTier::OnTrack => {
                "You're on the right track, but several adjustments are needed."
            }
            OverallTier::Basic => "Let's work on getting the basic alignment right.",
        }
    }
}

/// How strongly a joint needs adjusting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Slightly,
    Moderately,
    Significantly,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Slightly => "slightly",
            Intensity::Moderately => "moderately",
            Intensity::Significantly => "significantly",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEPTH_REMINDER: &str = "Try to maintain a more consistent depth in your pose.";

/// Cut-offs used to turn metrics into feedback.
///
/// Tier cut-offs are exclusive upper bounds checked from best to worst; the
/// first one the metric falls under wins, otherwise the tier is `Basic`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackThresholds {
    pub perfect_below: f64,
    pub very_good_below: f64,
    pub good_below: f64,
    pub on_track_below: f64,
    /// Joints must differ by strictly more than this (degrees) to get a line
    pub joint_difference_deg: f64,
    pub slight_below_deg: f64,
    pub moderate_below_deg: f64,
    /// Depth metric strictly above this adds the depth reminder
    pub depth_metric: f64,
}

impl Default for FeedbackThresholds {
    fn default() -> Self {
        Self {
            perfect_below: 0.08,
            very_good_below: 0.15,
            good_below: 0.25,
            on_track_below: 0.35,
            joint_difference_deg: 15.0,
            slight_below_deg: 25.0,
            moderate_below_deg: 40.0,
            depth_metric: 0.1,
        }
    }
}

impl FeedbackThresholds {
    /// NaN never satisfies a cut-off and lands in `Basic`.
    pub fn tier(&self, metric: f64) -> OverallTier {
        if metric < self.perfect_below {
            OverallTier::Perfect
        } else if metric < self.very_good_below {
            OverallTier::VeryGood
        } else if metric < self.good_below {
            OverallTier::Good
        } else if metric < self.on_track_below {
            OverallTier::OnTrack
        } else {
            OverallTier::Basic
        }
    }

    pub fn intensity(&self, difference: f64) -> Intensity {
        if difference < self.slight_below_deg {
            Intensity::Slightly
        } else if difference < self.moderate_below_deg {
            Intensity::Moderately
        } else {
            Intensity::Significantly
        }
    }
}

/// Ordered feedback lines for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    tier: OverallTier,
    lines: Vec<String>,
}

impl Feedback {
    pub fn tier(&self) -> OverallTier {
        self.tier
    }

    /// All lines, the tier line first
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Joint and depth lines after the tier line
    pub fn corrections(&self) -> &[String] {
        self.lines.get(1..).unwrap_or_default()
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Phrase a single joint correction.
pub fn joint_line(deviation: &JointDeviation, intensity: Intensity) -> String {
    match (deviation.joint, deviation.direction) {
        (Joint::Spine, Direction::Higher) => {
            format!("Your back is {intensity} tilted; try to straighten it.")
        }
        (Joint::Spine, Direction::Lower) => {
            format!("Your back is {intensity} slouched; work on straightening it.")
        }
        (joint, direction) => {
            // Detected above the reference means the limb must come down.
            let action = match direction {
                Direction::Higher => "lower",
                Direction::Lower => "raise",
            };
            format!(
                "Adjust your {}: {intensity} {action} it.",
                joint.display_name()
            )
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackGenerator {
    thresholds: FeedbackThresholds,
}

impl FeedbackGenerator {
    pub fn new(thresholds: FeedbackThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &FeedbackThresholds {
        &self.thresholds
    }

    pub fn generate(&self, result: &CorrectionResult) -> Feedback {
        self.generate_from(result.metric, &result.per_joint, result.depth_metric)
    }

    pub fn generate_from(
        &self,
        metric: f64,
        deviations: &[JointDeviation],
        depth_metric: f64,
    ) -> Feedback {
        let tier = self.thresholds.tier(metric);
        let mut lines = vec![tier.message().to_string()];

        for joint in Joint::ALL {
            let Some(deviation) = deviations.iter().find(|d| d.joint == joint) else {
                continue;
            };
            if deviation.difference > self.thresholds.joint_difference_deg {
                let intensity = self.thresholds.intensity(deviation.difference);
                lines.push(joint_line(deviation, intensity));
            }
        }

        if depth_metric > self.thresholds.depth_metric {
            lines.push(DEPTH_REMINDER.to_string());
        }

        Feedback { tier, lines }
    }
}

/// Generate feedback with the default thresholds
pub fn generate_correction_feedback(result: &CorrectionResult) -> Feedback {
    FeedbackGenerator::default().generate(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn still_deviations() -> Vec<JointDeviation> {
        Joint::ALL
            .iter()
            .map(|&joint| JointDeviation::between(joint, 90.0, 90.0))
            .collect()
    }

    fn with_deviation(joint: Joint, difference: f64, direction: Direction) -> Vec<JointDeviation> {
        still_deviations()
            .into_iter()
            .map(|d| {
                if d.joint == joint {
                    JointDeviation {
                        joint,
                        difference,
                        direction,
                    }
                } else {
                    d
                }
            })
            .collect()
    }

    #[test]
    fn test_perfect_is_single_line() {
        let feedback = FeedbackGenerator::default().generate_from(0.0, &still_deviations(), 0.0);
        assert_eq!(feedback.tier(), OverallTier::Perfect);
        assert_eq!(feedback.to_text(), "Perfect form! Keep holding this position.");
        assert!(feedback.corrections().is_empty());
    }

    #[test]
    fn test_corrections_without_lines() {
        let feedback = Feedback {
            tier: OverallTier::Perfect,
            lines: Vec::new(),
        };
        assert!(feedback.corrections().is_empty());
        assert_eq!(feedback.to_text(), "");
    }

    #[test]
    fn test_tier_boundaries() {
        let t = FeedbackThresholds::default();
        assert_eq!(t.tier(0.079), OverallTier::Perfect);
        assert_eq!(t.tier(0.08), OverallTier::VeryGood);
        assert_eq!(t.tier(0.15), OverallTier::Good);
        assert_eq!(t.tier(0.25), OverallTier::OnTrack);
        assert_eq!(t.tier(0.35), OverallTier::Basic);
        assert_eq!(t.tier(f64::NAN), OverallTier::Basic);
    }

    #[test]
    fn test_left_arm_slightly_lower() {
        let deviations = with_deviation(Joint::LeftArm, 20.0, Direction::Higher);
        let metric = 0.5 * (0.15 * 20.0 / 180.0);
        let feedback = FeedbackGenerator::default().generate_from(metric, &deviations, 0.0);

        assert_eq!(
            feedback.lines(),
            &[
                "Perfect form! Keep holding this position.".to_string(),
                "Adjust your left arm: slightly lower it.".to_string(),
            ]
        );
    }

    #[test]
    fn test_limb_direction_is_inverted() {
        let deviations = with_deviation(Joint::RightLeg, 30.0, Direction::Lower);
        let feedback = FeedbackGenerator::default().generate_from(0.2, &deviations, 0.0);
        assert_eq!(
            feedback.corrections(),
            &["Adjust your right leg: moderately raise it.".to_string()]
        );
    }

    #[test]
    fn test_spine_phrasing() {
        let generator = FeedbackGenerator::default();

        let tilted = generator.generate_from(
            0.3,
            &with_deviation(Joint::Spine, 45.0, Direction::Higher),
            0.0,
        );
        assert_eq!(
            tilted.corrections(),
            &["Your back is significantly tilted; try to straighten it.".to_string()]
        );

        let slouched = generator.generate_from(
            0.3,
            &with_deviation(Joint::Spine, 16.0, Direction::Lower),
            0.0,
        );
        assert_eq!(
            slouched.corrections(),
            &["Your back is slightly slouched; work on straightening it.".to_string()]
        );
    }

    #[test]
    fn test_joint_threshold_is_exclusive() {
        let deviations = with_deviation(Joint::LeftLeg, 15.0, Direction::Higher);
        let feedback = FeedbackGenerator::default().generate_from(0.0, &deviations, 0.0);
        assert!(feedback.corrections().is_empty());
    }

    #[test]
    fn test_intensity_boundaries() {
        let t = FeedbackThresholds::default();
        assert_eq!(t.intensity(24.9), Intensity::Slightly);
        assert_eq!(t.intensity(25.0), Intensity::Moderately);
        assert_eq!(t.intensity(39.9), Intensity::Moderately);
        assert_eq!(t.intensity(40.0), Intensity::Significantly);
    }

    #[test]
    fn test_canonical_order_and_depth_line() {
        // Deliberately shuffled input
        let deviations = vec![
            JointDeviation::between(Joint::Spine, 100.0, 150.0),
            JointDeviation::between(Joint::RightArm, 140.0, 160.0),
            JointDeviation::between(Joint::LeftArm, 170.0, 140.0),
        ];

        let feedback = FeedbackGenerator::default().generate_from(0.5, &deviations, 0.2);
        assert_eq!(
            feedback.to_text(),
            "Let's work on getting the basic alignment right.\n\
             Adjust your left arm: moderately lower it.\n\
             Adjust your right arm: slightly raise it.\n\
             Your back is significantly slouched; work on straightening it.\n\
             Try to maintain a more consistent depth in your pose."
        );
    }

    #[test]
    fn test_depth_threshold_is_exclusive() {
        let generator = FeedbackGenerator::default();
        assert_eq!(generator.generate_from(0.0, &[], 0.1).lines().len(), 1);
        assert_eq!(
            generator.generate_from(0.0, &[], 0.1001).corrections(),
            &[DEPTH_REMINDER.to_string()]
        );
    }

    proptest! {
        #[test]
        fn first_line_is_always_the_tier(metric in 0.0f64..1e6, depth in 0.0f64..1.0) {
            let feedback =
                FeedbackGenerator::default().generate_from(metric, &still_deviations(), depth);
            let tier_messages = [
                OverallTier::Perfect,
                OverallTier::VeryGood,
                OverallTier::Good,
                OverallTier::OnTrack,
                OverallTier::Basic,
            ]
            .map(|t| t.message());

            prop_assert_eq!(feedback.lines()[0].as_str(), feedback.tier().message());
            let tier_lines = feedback
                .lines()
                .iter()
                .filter(|line| tier_messages.contains(&line.as_str()))
                .count();
            prop_assert_eq!(tier_lines, 1);
        }
    }
}
