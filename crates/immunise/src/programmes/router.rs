use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{PatientId, ProgrammeId, SessionId};
use super::repository::RepositoryError;
use super::service::{
    NewInstruction, NewReply, NewTriageNote, NewVaccination, RegistrationUpdate, SessionService,
    SessionServiceError,
};

/// Router builder exposing the append and derivation endpoints.
pub fn session_router(service: Arc<SessionService>) -> Router {
    Router::new()
        .route("/api/v1/sessions/:session/replies", post(reply_handler))
        .route(
            "/api/v1/sessions/:session/triage-notes",
            post(triage_handler),
        )
        .route(
            "/api/v1/sessions/:session/instructions",
            post(instruction_handler),
        )
        .route(
            "/api/v1/sessions/:session/vaccinations",
            post(vaccination_handler),
        )
        .route(
            "/api/v1/sessions/:session/register",
            post(registration_handler),
        )
        .route(
            "/api/v1/sessions/:session/patients/:patient/programmes/:programme/status",
            get(status_handler),
        )
        .route(
            "/api/v1/sessions/:session/programmes/:programme/report",
            get(report_handler),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DateQuery {
    /// Evaluation date for the derivation (defaults to today).
    pub(crate) date: Option<NaiveDate>,
}

impl DateQuery {
    fn resolve(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

pub(crate) async fn reply_handler(
    State(service): State<Arc<SessionService>>,
    Path(session): Path<String>,
    Query(query): Query<DateQuery>,
    axum::Json(new): axum::Json<NewReply>,
) -> Response {
    let session = SessionId(session);
    match service.append_reply(&session, new, Utc::now(), query.resolve()) {
        Ok(statuses) => (StatusCode::CREATED, axum::Json(statuses)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn triage_handler(
    State(service): State<Arc<SessionService>>,
    Path(session): Path<String>,
    Query(query): Query<DateQuery>,
    axum::Json(new): axum::Json<NewTriageNote>,
) -> Response {
    let session = SessionId(session);
    match service.append_triage_note(&session, new, Utc::now(), query.resolve()) {
        Ok(statuses) => (StatusCode::CREATED, axum::Json(statuses)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn instruction_handler(
    State(service): State<Arc<SessionService>>,
    Path(session): Path<String>,
    Query(query): Query<DateQuery>,
    axum::Json(new): axum::Json<NewInstruction>,
) -> Response {
    let session = SessionId(session);
    match service.append_instruction(&session, new, Utc::now(), query.resolve()) {
        Ok(statuses) => (StatusCode::CREATED, axum::Json(statuses)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn vaccination_handler(
    State(service): State<Arc<SessionService>>,
    Path(session): Path<String>,
    Query(query): Query<DateQuery>,
    axum::Json(new): axum::Json<NewVaccination>,
) -> Response {
    let session = SessionId(session);
    match service.record_vaccination(&session, new, Utc::now(), query.resolve()) {
        Ok(statuses) => (StatusCode::CREATED, axum::Json(statuses)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn registration_handler(
    State(service): State<Arc<SessionService>>,
    Path(session): Path<String>,
    axum::Json(update): axum::Json<RegistrationUpdate>,
) -> Response {
    let session = SessionId(session);
    let patient = update.patient.clone();
    match service.set_registration(&session, update) {
        Ok(()) => {
            let payload = json!({
                "session": session.0,
                "patient": patient.0,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler(
    State(service): State<Arc<SessionService>>,
    Path((session, patient, programme)): Path<(String, String, String)>,
    Query(query): Query<DateQuery>,
) -> Response {
    let result = service.patient_status(
        &PatientId(patient),
        &SessionId(session),
        &ProgrammeId(programme),
        query.resolve(),
    );
    match result {
        Ok(statuses) => (StatusCode::OK, axum::Json(statuses)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler(
    State(service): State<Arc<SessionService>>,
    Path((session, programme)): Path<(String, String)>,
    Query(query): Query<DateQuery>,
) -> Response {
    let result = service.session_report(
        &SessionId(session),
        &ProgrammeId(programme),
        query.resolve(),
    );
    match result {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: SessionServiceError) -> Response {
    let status = match &error {
        SessionServiceError::Repository(RepositoryError::NotFound { .. }) => StatusCode::NOT_FOUND,
        SessionServiceError::Repository(RepositoryError::Conflict { .. }) => StatusCode::CONFLICT,
        SessionServiceError::ProgrammeNotOffered(..)
        | SessionServiceError::InvalidRegistration { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
