use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use crate::infra::AppState;
use immunise::programmes::{
    session_router, ProgrammeId, RepositoryError, SessionId, SessionService, SessionServiceError,
};

pub(crate) fn with_session_routes(service: Arc<SessionService>) -> axum::Router {
    let csv_routes = axum::Router::new()
        .route(
            "/api/v1/sessions/:session/programmes/:programme/report.csv",
            axum::routing::get(report_csv_endpoint),
        )
        .with_state(service.clone());

    session_router(service)
        .merge(csv_routes)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Acquire) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "starting" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    state.metrics.render()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    pub(crate) date: Option<NaiveDate>,
}

/// CSV download of the per-patient session report, one column per status
/// badge, for upload into reporting spreadsheets.
pub(crate) async fn report_csv_endpoint(
    State(service): State<Arc<SessionService>>,
    Path((session, programme)): Path<(String, String)>,
    Query(query): Query<ReportQuery>,
) -> axum::response::Response {
    let today = query.date.unwrap_or_else(|| Local::now().date_naive());
    let summary = match service.session_report(
        &SessionId(session),
        &ProgrammeId(programme),
        today,
    ) {
        Ok(summary) => summary,
        Err(SessionServiceError::Repository(RepositoryError::NotFound { .. })) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "session or programme not found" })),
            )
                .into_response();
        }
        Err(other) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": other.to_string() })),
            )
                .into_response();
        }
    };

    match summary.to_csv() {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}
