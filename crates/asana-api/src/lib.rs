//! # Asana-API
//!
//! Real-time pose scoring over WebSocket.
//!
//! A client streams one JSON message per camera frame carrying 33 detected
//! landmarks. Each frame is classified, compared with the predicted pose's
//! reference, and answered with the pose name, a confidence and corrective
//! feedback.
//!
//! ## Endpoints
//!
//! - `GET /predict` - WebSocket frame stream
//! - `GET /health` - Health check

pub mod classifier;
pub mod config;
pub mod scorer;
pub mod server;

pub use self::classifier::*;
pub use self::config::*;
pub use self::scorer::*;
pub use self::server::*;
