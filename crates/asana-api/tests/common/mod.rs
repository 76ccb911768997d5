#![allow(dead_code)]

use asana_api::{build_scorer, ApiConfig, FrameScorer};
use asana_core::{Landmark, LandmarkIndex, LandmarkVector, PoseReferenceTable};
use asana_correction::KeypointRecord;
use serde_json::{json, Value};

pub const STANDING: &str = "Tadasana";
pub const ARMS_RAISED: &str = "Urdhva Hastasana";

/// Upright figure facing the camera, arms hanging straight down.
pub fn standing_pose() -> LandmarkVector {
    LandmarkVector::default().map(|idx, _| {
        use LandmarkIndex::*;
        let (x, y) = match idx {
            LeftShoulder => (0.6, 0.3),
            RightShoulder => (0.4, 0.3),
            LeftElbow => (0.6, 0.45),
            RightElbow => (0.4, 0.45),
            LeftWrist => (0.6, 0.6),
            RightWrist => (0.4, 0.6),
            LeftHip => (0.55, 0.6),
            RightHip => (0.45, 0.6),
            LeftKnee => (0.55, 0.8),
            RightKnee => (0.45, 0.8),
            LeftAnkle => (0.55, 1.0),
            RightAnkle => (0.45, 1.0),
            _ => (0.5, 0.1),
        };
        Landmark::new(x, y, 0.0, 1.0)
    })
}

/// Standing pose with both arms straight overhead.
pub fn arms_raised_pose() -> LandmarkVector {
    standing_pose().map(|idx, lm| match idx {
        LandmarkIndex::LeftElbow => Landmark::new(0.6, 0.15, 0.0, 1.0),
        LandmarkIndex::RightElbow => Landmark::new(0.4, 0.15, 0.0, 1.0),
        LandmarkIndex::LeftWrist => Landmark::new(0.6, 0.0, 0.0, 1.0),
        LandmarkIndex::RightWrist => Landmark::new(0.4, 0.0, 0.0, 1.0),
        _ => *lm,
    })
}

/// Standing pose with the left elbow bent to a right angle.
pub fn left_elbow_bent_pose() -> LandmarkVector {
    standing_pose().map(|idx, lm| match idx {
        LandmarkIndex::LeftWrist => Landmark::new(0.75, 0.45, 0.0, 1.0),
        _ => *lm,
    })
}

pub fn reference_table() -> PoseReferenceTable {
    PoseReferenceTable::from_samples(vec![
        (STANDING, standing_pose()),
        (ARMS_RAISED, arms_raised_pose()),
    ])
}

pub fn default_scorer() -> FrameScorer {
    build_scorer(&ApiConfig::default(), reference_table())
}

pub fn records(pose: &LandmarkVector) -> Vec<KeypointRecord> {
    pose.iter()
        .map(|lm| KeypointRecord::new(lm.x, lm.y, lm.z, lm.visibility))
        .collect()
}

pub fn frame(pose: &LandmarkVector) -> Value {
    json!({ "keypoints": records(pose) })
}

/// Frame with every coordinate encoded as a string, the way browser clients send them.
pub fn string_frame(pose: &LandmarkVector) -> Value {
    let keypoints: Vec<Value> = pose
        .iter()
        .map(|lm| {
            json!({
                "x": lm.x.to_string(),
                "y": lm.y.to_string(),
                "z": lm.z.to_string(),
                "visibility": lm.visibility.to_string(),
            })
        })
        .collect();
    json!({ "keypoints": keypoints })
}
