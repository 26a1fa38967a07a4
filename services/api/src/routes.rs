use crate::commands::results_csv;
use crate::infra::{score_csv_blocking, AppState, ClassifierChoice, OfferInput, ScoringState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use lead_intent::error::AppError;
use lead_intent::workflows::leads::{write_sample_csv, BatchSummary, ScoredLead};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    #[serde(default)]
    pub(crate) offer: OfferInput,
    pub(crate) leads_csv: String,
    #[serde(default)]
    pub(crate) classifier: ClassifierChoice,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreResponse {
    pub(crate) summary: BatchSummary,
    pub(crate) results: Vec<ScoredLead>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) saved_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) persist_error: Option<String>,
}

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

pub(crate) fn lead_routes(scoring: Arc<ScoringState>) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/leads/score", post(score_endpoint))
        .route("/api/v1/leads/export", post(export_endpoint))
        .route("/api/v1/leads/sample", get(sample_endpoint))
        .layer(Extension(scoring))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scores the batch and persists it; a failed write is reported alongside
/// the still-valid results.
pub(crate) async fn score_endpoint(
    Extension(scoring): Extension<Arc<ScoringState>>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let ScoreRequest {
        offer,
        leads_csv,
        classifier,
    } = payload;

    let (results, persisted) =
        score_csv_blocking(scoring, offer.to_offer(), leads_csv, classifier, true).await?;

    Ok(Json(ScoreResponse {
        summary: BatchSummary::from_results(&results),
        results,
        saved_to: persisted.saved_to,
        persist_error: persisted.persist_error,
    }))
}

/// Same scoring as `score_endpoint`, returned as a CSV download.
pub(crate) async fn export_endpoint(
    Extension(scoring): Extension<Arc<ScoringState>>,
    Json(payload): Json<ScoreRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (results, _) = score_csv_blocking(
        scoring,
        payload.offer.to_offer(),
        payload.leads_csv,
        payload.classifier,
        false,
    )
    .await?;

    let body = results_csv(&results)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"scored_leads.csv\"",
            ),
        ],
        body,
    ))
}

pub(crate) async fn sample_endpoint() -> Result<impl IntoResponse, AppError> {
    let mut buffer = Vec::new();
    write_sample_csv(&mut buffer)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sample_leads.csv\"",
            ),
        ],
        buffer,
    ))
}
