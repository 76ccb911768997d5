//! Canonical reference poses.
//!
//! The table is built once at startup and never mutated afterwards; share it
//! behind an `Arc` and read it from as many frame scorers as needed.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{LandmarkIndex, LandmarkVector, VALUES_PER_LANDMARK};

/// Pose name → ideal landmark configuration.
///
/// Poses keep the order they were first seen in (key order of the persisted
/// file), and that position is the class index reported for each pose.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseReferenceTable {
    poses: Vec<(String, LandmarkVector)>,
    index: HashMap<String, usize>,
}

impl PoseReferenceTable {
    /// Build from ordered entries. A repeated name replaces the earlier
    /// vector but keeps its position.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, LandmarkVector)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (pose, vector) in entries {
            table.insert(pose.into(), vector);
        }
        table
    }

    fn insert(&mut self, pose: String, vector: LandmarkVector) {
        match self.index.get(&pose) {
            Some(&i) => self.poses[i].1 = vector,
            None => {
                self.index.insert(pose.clone(), self.poses.len());
                self.poses.push((pose, vector));
            }
        }
    }

    /// Parse the persisted form: `{ "<pose>": [[x, y, z, visibility], ...] }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut table = Self::default();
        for (pose, value) in raw {
            let vector = serde_json::from_value::<Vec<[f64; 4]>>(value)
                .map_err(Error::from)
                .and_then(|rows| LandmarkVector::from_rows(&rows))
                .map_err(|e| Error::ReferencePose {
                    pose: pose.clone(),
                    reason: e.to_string(),
                })?;
            table.insert(pose, vector);
        }

        Ok(table)
    }

    /// Load the persisted table from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&content)?;

        tracing::info!(
            path = %path.display(),
            poses = table.len(),
            "Loaded reference pose table"
        );

        Ok(table)
    }

    /// Average every sample of a pose element-wise into one reference vector.
    pub fn from_samples<I, S>(samples: I) -> Self
    where
        I: IntoIterator<Item = (S, LandmarkVector)>,
        S: Into<String>,
    {
        const FLAT_LEN: usize = LandmarkIndex::COUNT * VALUES_PER_LANDMARK;

        let mut order: Vec<String> = Vec::new();
        let mut sums: HashMap<String, ([f64; FLAT_LEN], usize)> = HashMap::new();
        for (pose, vector) in samples {
            let pose = pose.into();
            let entry = sums.entry(pose.clone()).or_insert_with(|| {
                order.push(pose);
                ([0.0; FLAT_LEN], 0)
            });
            for (acc, value) in entry.0.iter_mut().zip(vector.to_flat()) {
                *acc += value;
            }
            entry.1 += 1;
        }

        Self::new(order.into_iter().filter_map(|pose| {
            let (sum, count) = sums.get(&pose)?;
            let mean: Vec<f64> = sum.iter().map(|v| v / *count as f64).collect();
            LandmarkVector::from_flat(&mean).ok().map(|v| (pose, v))
        }))
    }

    pub fn get(&self, pose: &str) -> Option<&LandmarkVector> {
        self.index.get(pose).map(|&i| &self.poses[i].1)
    }

    pub fn contains(&self, pose: &str) -> bool {
        self.index.contains_key(pose)
    }

    /// Class index of a pose
    pub fn index_of(&self, pose: &str) -> Option<usize> {
        self.index.get(pose).copied()
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.poses.get(index).map(|(name, _)| name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.poses.iter().map(|(name, _)| name.as_str())
    }

    /// Entries in class-index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LandmarkVector)> {
        self.poses.iter().map(|(name, vector)| (name.as_str(), vector))
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}
