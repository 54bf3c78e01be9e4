//! JSON HTTP adapter over [`MatchService`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/match` | Compare `{resume_path, jd_path}` and record the result |
//! | `GET`  | `/history?limit=N` | Recorded comparisons, oldest first |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "unsupported_format", "message": "..." } }
//! ```
//!
//! Codes: `bad_request` (400), `unsupported_format` (400), `not_found` (404),
//! `extraction_failed` (422), `timeout` (408), `not_recorded` (500, with the
//! computed `scores`), `internal` (500).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::extract::ExtractError;
use crate::models::{MatchRecord, MatchScores};
use crate::service::{MatchError, MatchReport, MatchService};

/// Build the router around a shared service.
pub fn router(service: Arc<MatchService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/match", post(handle_match))
        .route("/history", get(handle_history))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(service)
}

/// Bind to `bind` and serve until the process is terminated.
pub async fn run_server(bind: &str, service: Arc<MatchService>) -> anyhow::Result<()> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("listening on http://{}", bind);
    println!("Resume matcher listening on http://{}", bind);
    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<MatchScores>,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    scores: Option<MatchScores>,
}

impl AppError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            scores: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
            scores: self.scores,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        let message = error_chain(&err);
        match err {
            MatchError::Extraction { source, .. } => match source {
                ExtractError::UnsupportedFormat(_) => {
                    AppError::new(StatusCode::BAD_REQUEST, "unsupported_format", message)
                }
                ExtractError::Io { ref source, .. }
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    AppError::new(StatusCode::NOT_FOUND, "not_found", message)
                }
                ExtractError::OcrTimeout { .. } => {
                    AppError::new(StatusCode::REQUEST_TIMEOUT, "timeout", message)
                }
                _ => AppError::new(StatusCode::UNPROCESSABLE_ENTITY, "extraction_failed", message),
            },
            MatchError::NotRecorded { scores, .. } => {
                tracing::error!("{}", message);
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "not_recorded",
                    message,
                    scores: Some(scores),
                }
            }
        }
    }
}

/// `outer: cause: root cause`, one segment per error in the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ POST /match ============

#[derive(Deserialize)]
struct MatchRequest {
    resume_path: String,
    jd_path: String,
}

async fn handle_match(
    State(service): State<Arc<MatchService>>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchReport>, AppError> {
    if req.resume_path.trim().is_empty() || req.jd_path.trim().is_empty() {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "bad_request",
            "both resume_path and jd_path are required",
        ));
    }

    let report = service
        .run_match(&PathBuf::from(req.resume_path), &PathBuf::from(req.jd_path))
        .await?;
    Ok(Json(report))
}

// ============ GET /history ============

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<i64>,
}

#[derive(Serialize)]
struct HistoryResponse {
    total: i64,
    records: Vec<MatchRecord>,
}

async fn handle_history(
    State(service): State<Arc<MatchService>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let limit = match query.limit {
        Some(n) if n < 1 => {
            return Err(AppError::new(
                StatusCode::BAD_REQUEST,
                "bad_request",
                "limit must be >= 1",
            ))
        }
        Some(n) => Some(n as usize),
        None => None,
    };

    let internal = |e: crate::ledger::LedgerError| {
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", e.to_string())
    };
    let ledger = service.ledger();
    let total = ledger.count().await.map_err(internal)?;
    let records = ledger.list(limit).await.map_err(internal)?;
    Ok(Json(HistoryResponse { total, records }))
}
