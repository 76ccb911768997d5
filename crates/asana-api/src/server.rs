//! WebSocket server exposing the frame scorer.
//!
//! ## Endpoints
//!
//! - `GET /predict` - WebSocket; one JSON frame in, one JSON reply out
//! - `GET /health` - Health check

use asana_core::{PoseReferenceTable, Result};
use asana_correction::{CorrectionCalculator, FeedbackGenerator};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::classifier::NearestReferenceClassifier;
use crate::config::{ApiConfig, CorsConfig};
use crate::scorer::FrameScorer;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<FrameScorer>,
    pub max_frame_bytes: usize,
}

impl AppState {
    pub fn new(scorer: Arc<FrameScorer>, max_frame_bytes: usize) -> Self {
        Self {
            scorer,
            max_frame_bytes,
        }
    }
}

/// Build a scorer backed by the built-in nearest-reference classifier.
pub fn build_scorer(config: &ApiConfig, references: PoseReferenceTable) -> FrameScorer {
    let references = Arc::new(references);
    let calculator = CorrectionCalculator::new(config.correction);

    let classifier = NearestReferenceClassifier::new(
        Arc::clone(&references),
        calculator.clone(),
        config.classifier.temperature,
    );

    FrameScorer::new(
        references,
        Arc::new(classifier),
        calculator,
        FeedbackGenerator::new(config.feedback),
    )
}

pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/predict", get(handle_ws_upgrade))
        .route("/health", get(handle_health))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age_secs))
}

/// Start the server and run until the listener fails
pub async fn serve(config: ApiConfig, scorer: Arc<FrameScorer>) -> Result<()> {
    let addr = config.server.bind_addr;
    let state = AppState::new(scorer, config.server.max_frame_bytes);
    let router = build_router(state, &config.cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Pose scoring server listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;
    Ok(())
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "reference_poses": state.scorer.references().len(),
        "classifier": state.scorer.classifier_name(),
    }))
}

async fn handle_ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.max_message_size(state.max_frame_bytes)
        .on_upgrade(move |socket| handle_ws_connection(socket, state))
}

async fn handle_ws_connection(mut socket: WebSocket, state: AppState) {
    tracing::info!("Client connected");

    while let Some(msg) = socket.recv().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(data)) => match String::from_utf8(data) {
                Ok(text) => text,
                Err(_) => {
                    tracing::debug!("Ignoring non-UTF-8 binary frame");
                    continue;
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("WebSocket receive error: {}", e);
                break;
            }
        };

        let response = state.scorer.score_text(&text).await;
        let body = match serde_json::to_string(&response) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to encode frame response: {}", e);
                continue;
            }
        };

        if socket.send(Message::Text(body)).await.is_err() {
            break;
        }
    }

    tracing::info!("Client disconnected");
}
