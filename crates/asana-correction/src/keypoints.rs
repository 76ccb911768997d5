//! Keypoint normalization.
//!
//! Landmark producers send loosely structured records: any coordinate may be
//! missing, `null`, a number, or a numeric string. Normalization turns them
//! into the flat `[x, y, z, visibility]*` layout the rest of the pipeline uses.

use serde::{Deserialize, Deserializer, Serialize};

/// A single landmark as delivered by the landmark producer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KeypointRecord {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub y: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub z: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub visibility: Option<f64>,
}

impl KeypointRecord {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            visibility: Some(visibility),
        }
    }

    /// Values in flat layout order, absent fields as `0.0`.
    pub fn values(&self) -> [f64; 4] {
        [
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(0.0),
            self.visibility.unwrap_or(0.0),
        ]
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Raw::Number(value)) => value,
        Some(Raw::Text(text)) => text.trim().parse::<f64>().map_err(|e| {
            serde::de::Error::custom(format!("invalid coordinate {text:?}: {e}"))
        })?,
    };

    if !value.is_finite() {
        return Err(serde::de::Error::custom(format!(
            "coordinate must be finite, got {value}"
        )));
    }
    Ok(Some(value))
}

/// Flatten records into `4 × records.len()` values, preserving input order.
///
/// Never fails and does not check the landmark count; that is validated when
/// the result is turned into a `LandmarkVector`.
pub fn normalize_keypoints(records: &[KeypointRecord]) -> Vec<f64> {
    records.iter().flat_map(KeypointRecord::values).collect()
}
