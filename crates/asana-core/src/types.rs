//! Fundamental types for pose correction.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// One tracked body point: 3D position plus a visibility confidence.
///
/// Visibility is carried through but never enters angle or position math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn to_row(&self) -> [f64; 4] {
        [self.x, self.y, self.z, self.visibility]
    }
}

/// 33-landmark body numbering shared with the upstream landmark producer.
///
/// Discriminants are the wire indices and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    /// Every landmark in wire order.
    pub const ALL: [LandmarkIndex; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(idx: u8) -> Option<Self> {
        Self::ALL.get(idx as usize).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Values per landmark in the flat layout: x, y, z, visibility.
pub const VALUES_PER_LANDMARK: usize = 4;

/// Exactly 33 landmarks, in [`LandmarkIndex`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 4]>", into = "Vec<[f64; 4]>")]
pub struct LandmarkVector([Landmark; LandmarkIndex::COUNT]);

impl LandmarkVector {
    pub fn new(landmarks: [Landmark; LandmarkIndex::COUNT]) -> Self {
        Self(landmarks)
    }

    /// Build from the flat `[x, y, z, visibility]*` layout.
    pub fn from_flat(values: &[f64]) -> Result<Self> {
        if values.len() % VALUES_PER_LANDMARK != 0 {
            return Err(Error::InvalidInput(format!(
                "flat landmark data length {} is not a multiple of {}",
                values.len(),
                VALUES_PER_LANDMARK
            )));
        }

        let actual = values.len() / VALUES_PER_LANDMARK;
        if actual != LandmarkIndex::COUNT {
            return Err(Error::LandmarkCount {
                expected: LandmarkIndex::COUNT,
                actual,
            });
        }

        let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
        for (slot, chunk) in landmarks
            .iter_mut()
            .zip(values.chunks_exact(VALUES_PER_LANDMARK))
        {
            *slot = Landmark::new(chunk[0], chunk[1], chunk[2], chunk[3]);
        }

        Ok(Self(landmarks))
    }

    /// Build from per-landmark rows, the persisted reference format.
    pub fn from_rows(rows: &[[f64; 4]]) -> Result<Self> {
        if rows.len() != LandmarkIndex::COUNT {
            return Err(Error::LandmarkCount {
                expected: LandmarkIndex::COUNT,
                actual: rows.len(),
            });
        }

        let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
        for (slot, row) in landmarks.iter_mut().zip(rows) {
            *slot = Landmark::new(row[0], row[1], row[2], row[3]);
        }

        Ok(Self(landmarks))
    }

    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.0[index.index()]
    }

    pub fn point(&self, index: LandmarkIndex) -> Point3<f64> {
        self.get(index).position()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.0.iter()
    }

    pub fn landmarks(&self) -> &[Landmark; LandmarkIndex::COUNT] {
        &self.0
    }

    /// Produce a new vector with `f` applied to every landmark.
    pub fn map(&self, mut f: impl FnMut(LandmarkIndex, &Landmark) -> Landmark) -> Self {
        let mut landmarks = self.0;
        for (index, slot) in LandmarkIndex::ALL.iter().zip(landmarks.iter_mut()) {
            *slot = f(*index, slot);
        }
        Self(landmarks)
    }

    pub fn to_flat(&self) -> Vec<f64> {
        self.0.iter().flat_map(|lm| lm.to_row()).collect()
    }

    pub fn to_rows(&self) -> Vec<[f64; 4]> {
        self.0.iter().map(Landmark::to_row).collect()
    }
}

impl Default for LandmarkVector {
    fn default() -> Self {
        Self([Landmark::default(); LandmarkIndex::COUNT])
    }
}

impl TryFrom<Vec<[f64; 4]>> for LandmarkVector {
    type Error = Error;

    fn try_from(rows: Vec<[f64; 4]>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<LandmarkVector> for Vec<[f64; 4]> {
    fn from(vector: LandmarkVector) -> Self {
        vector.to_rows()
    }
}

/// Scored joints, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    Spine,
}

/// Landmarks that define the angle of a [`Joint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointLandmarks {
    /// Proximal, vertex and distal landmarks of a limb.
    Limb([LandmarkIndex; 3]),
    /// Three landmark pairs; the angle is taken at the midpoint of the second pair.
    Midpoints([(LandmarkIndex, LandmarkIndex); 3]),
}

impl Joint {
    pub const COUNT: usize = 5;

    pub const ALL: [Joint; Self::COUNT] = [
        Joint::LeftArm,
        Joint::RightArm,
        Joint::LeftLeg,
        Joint::RightLeg,
        Joint::Spine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Joint::LeftArm => "left_arm",
            Joint::RightArm => "right_arm",
            Joint::LeftLeg => "left_leg",
            Joint::RightLeg => "right_leg",
            Joint::Spine => "spine",
        }
    }

    /// Human-readable name, separators replaced with spaces.
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn landmarks(&self) -> JointLandmarks {
        use LandmarkIndex::*;

        match self {
            Joint::LeftArm => JointLandmarks::Limb([LeftShoulder, LeftElbow, LeftWrist]),
            Joint::RightArm => JointLandmarks::Limb([RightShoulder, RightElbow, RightWrist]),
            Joint::LeftLeg => JointLandmarks::Limb([LeftHip, LeftKnee, LeftAnkle]),
            Joint::RightLeg => JointLandmarks::Limb([RightHip, RightKnee, RightAnkle]),
            Joint::Spine => JointLandmarks::Midpoints([
                (LeftShoulder, RightShoulder),
                (LeftHip, RightHip),
                (LeftKnee, RightKnee),
            ]),
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the detected angle sits above or below the reference angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Higher,
    Lower,
}

impl Direction {
    /// `Higher` only when `detected` is strictly greater; ties resolve to `Lower`.
    pub fn compare(detected: f64, reference: f64) -> Self {
        if detected > reference {
            Direction::Higher
        } else {
            Direction::Lower
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Higher => "higher",
            Direction::Lower => "lower",
        }
    }
}
