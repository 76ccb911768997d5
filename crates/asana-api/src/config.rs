//! Scoring service configuration.

use asana_core::{Error, Result};
use asana_correction::{CorrectionConfig, FeedbackThresholds};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// HTTP / WebSocket server configuration
    pub server: ServerConfig,

    /// Reference pose table location
    pub references: ReferenceConfig,

    /// Built-in classifier tuning
    pub classifier: ClassifierConfig,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Joint and metric weights
    pub correction: CorrectionConfig,

    /// Feedback cut-offs
    pub feedback: FeedbackThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub bind_addr: SocketAddr,

    /// Maximum size of a single frame message (bytes)
    pub max_frame_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            max_frame_bytes: 256 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Path to the persisted reference pose table (JSON)
    pub path: PathBuf,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("average_keypoints.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Softmax temperature over negated correction metrics
    pub temperature: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { temperature: 0.05 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` allows any origin
    pub allowed_origins: Vec<String>,

    /// Max age (seconds)
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            max_age_secs: 3600,
        }
    }
}

impl ApiConfig {
    /// Load configuration from file, with `ASANA_` environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("ASANA").separator("__"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Self::finish(settings)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("ASANA").separator("__"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> Result<Self> {
        let config: Self = settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.correction
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;

        if !(self.classifier.temperature.is_finite() && self.classifier.temperature > 0.0) {
            return Err(Error::Config(format!(
                "classifier temperature must be positive, got {}",
                self.classifier.temperature
            )));
        }

        Ok(())
    }
}
