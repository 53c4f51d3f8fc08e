//! HTTP routes and handlers
//!
//! One API endpoint (`POST /api/process`) feeds the capture text and a
//! protocol selector into the decoder library and serializes the result; all
//! other paths fall through to the bundled frontend, with an `index.html`
//! fallback so client-side routing keeps working after a refresh.

use crate::error::ApiError;
use axum::{response::Json, routing::post, Router};
use isotp_decoder::{decode_capture, CaptureStats, LogicalMessage, Protocol};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

/// Process request body, as sent by the frontend upload form
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    /// Original filename; used for logging only
    #[serde(default)]
    pub filename: Option<String>,
    /// Raw capture table text
    #[serde(default)]
    pub content: Option<String>,
    /// Multiplexing selector; accepted but unsupported
    #[serde(default)]
    pub multiplexing: Option<String>,
    /// Protocol selector; only "isotp" activates reassembly
    #[serde(default)]
    pub protocol: Option<String>,
}

/// One decoded message as rendered in the frontend table
#[derive(Debug, Serialize)]
pub struct MessageRecord {
    pub timestamp: f64,
    pub arbitration_id: String,
    pub payload: String,
    pub length: usize,
}

impl From<LogicalMessage> for MessageRecord {
    fn from(message: LogicalMessage) -> Self {
        let length = message.byte_len();
        Self {
            timestamp: message.timestamp,
            arbitration_id: message.arbitration_id,
            payload: message.payload_hex,
            length,
        }
    }
}

/// Process response body
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub messages: Vec<MessageRecord>,
    #[serde(flatten)]
    pub stats: CaptureStats,
    pub protocol: String,
}

/// Build the application router: the process API plus static frontend
/// serving with SPA index fallback.
pub fn create_router(static_dir: &Path) -> Router {
    let frontend = ServeDir::new(static_dir)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/process", post(process_capture))
        .fallback_service(frontend)
        .layer(CorsLayer::permissive())
}

/// Decode an uploaded capture and summarize the result.
///
/// Each request runs the full parse-then-reassemble pass with its own state;
/// nothing is shared between requests and nothing persists afterwards.
async fn process_capture(
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let content = request
        .content
        .as_deref()
        .filter(|content| !content.trim().is_empty())
        .ok_or(ApiError::MissingContent)?;

    let protocol = Protocol::from_selector(request.protocol.as_deref().unwrap_or("none"));

    log::info!(
        "Processing capture {:?} ({} bytes, protocol: {})",
        request.filename.as_deref().unwrap_or("<unnamed>"),
        content.len(),
        protocol
    );
    if let Some(multiplexing) = request.multiplexing.as_deref() {
        if multiplexing != "none" {
            log::debug!("Ignoring unsupported multiplexing selector {:?}", multiplexing);
        }
    }

    let messages = decode_capture(content, protocol);
    if messages.is_empty() {
        return Err(ApiError::NoValidMessages);
    }

    let stats = CaptureStats::from_messages(&messages);
    log::info!(
        "Decoded {} messages from {} senders",
        stats.total_messages,
        stats.unique_arbids
    );

    Ok(Json(ProcessResponse {
        messages: messages.into_iter().map(MessageRecord::from).collect(),
        stats,
        protocol: protocol.to_string(),
    }))
}
