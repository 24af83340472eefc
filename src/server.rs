//! HTTP transport for the wellness analyzer
//!
//! Routes:
//! - `POST /analyze`: score a snapshot and attach an insight
//! - `GET /health`: liveness check
//! - everything else: static files from the configured directory

use crate::analyzer::WellnessAnalyzer;
use crate::config::ServerConfig;
use crate::insight::{InsightService, TemplateInsightGenerator};
use crate::types::{InsightResponse, UsageSnapshot};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that stop the server from starting
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-request failures, rendered as `{"error": "..."}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: WellnessAnalyzer,
    pub insights: Arc<InsightService>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            analyzer: WellnessAnalyzer::new(),
            insights: Arc::new(InsightService::from_config(&config.insight)),
        }
    }
}

/// Build the application router
pub fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the wellness API server
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let addr: SocketAddr = config.bind_address.parse()?;
    let state = AppState::new(&config);

    tracing::info!(
        %addr,
        static_dir = %config.static_dir,
        insight_backend = state.insights.backend_name(),
        "starting wellness API server"
    );

    let app = router(state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<InsightResponse>, ApiError> {
    let snapshot = parse_request(&body)?;

    let analyzer = state.analyzer;
    let scored = snapshot.clone();
    let analysis = tokio::task::spawn_blocking(move || analyzer.analyze(&scored))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "analysis task failed");
            ApiError::Internal(e.to_string())
        })?;

    // The insight may block on the network. A crash there still returns the
    // computed analysis with the local template text.
    let insights = Arc::clone(&state.insights);
    let described = analysis.clone();
    let llm_insight = tokio::task::spawn_blocking(move || insights.generate(&described, &snapshot))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "insight task failed, using template");
            TemplateInsightGenerator.render(&analysis)
        });

    let response = InsightResponse {
        analysis,
        llm_insight,
    };
    Ok(Json(response))
}

/// Reject empty or blank bodies before they reach the analyzer
fn parse_request(body: &[u8]) -> Result<UsageSnapshot, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if is_blank(&value) {
        return Err(no_data());
    }

    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn no_data() -> ApiError {
    ApiError::BadRequest("No data provided".to_string())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
