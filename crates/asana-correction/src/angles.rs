//! Joint angle extraction from a landmark vector.

use asana_core::{joint_angle, midpoint, Joint, JointLandmarks, LandmarkIndex, LandmarkVector};
use serde::{Deserialize, Serialize};

/// Angle in degrees, in `[0, 180]`, for each scored joint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngleSet {
    pub left_arm: f64,
    pub right_arm: f64,
    pub left_leg: f64,
    pub right_leg: f64,
    pub spine: f64,
}

impl JointAngleSet {
    pub fn get(&self, joint: Joint) -> f64 {
        match joint {
            Joint::LeftArm => self.left_arm,
            Joint::RightArm => self.right_arm,
            Joint::LeftLeg => self.left_leg,
            Joint::RightLeg => self.right_leg,
            Joint::Spine => self.spine,
        }
    }

    fn set(&mut self, joint: Joint, angle: f64) {
        let slot = match joint {
            Joint::LeftArm => &mut self.left_arm,
            Joint::RightArm => &mut self.right_arm,
            Joint::LeftLeg => &mut self.left_leg,
            Joint::RightLeg => &mut self.right_leg,
            Joint::Spine => &mut self.spine,
        };
        *slot = angle;
    }

    /// Angles in canonical joint order
    pub fn iter(&self) -> impl Iterator<Item = (Joint, f64)> + '_ {
        Joint::ALL.iter().map(move |&joint| (joint, self.get(joint)))
    }
}

/// Angle of a single joint.
pub fn calculate_joint(landmarks: &LandmarkVector, joint: Joint) -> f64 {
    match joint.landmarks() {
        JointLandmarks::Limb([proximal, vertex, distal]) => joint_angle(
            &landmarks.point(proximal),
            &landmarks.point(vertex),
            &landmarks.point(distal),
        ),
        JointLandmarks::Midpoints([top, mid, bottom]) => {
            let centre = |(a, b): (LandmarkIndex, LandmarkIndex)| {
                midpoint(&landmarks.point(a), &landmarks.point(b))
            };
            joint_angle(&centre(top), &centre(mid), &centre(bottom))
        }
    }
}

/// Compute every joint angle; visibility is ignored.
pub fn calculate_angles(landmarks: &LandmarkVector) -> JointAngleSet {
    let mut angles = JointAngleSet::default();
    for joint in Joint::ALL {
        angles.set(joint, calculate_joint(landmarks, joint));
    }
    angles
}
