use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::domain::{
    AuditEvent, AuditEventKind, ConsentDecision, EventId, HealthAnswer, PatientId, ProgrammeId,
    RegistrationOutcome, Reply, ReplyId, Respondent, ScreenOutcome, SessionId, Vaccination,
    VaccinationId, VaccinationOutcome, VaccineMethod,
};
use super::engine::{self, StatusSet};
use super::report::views::SessionReportSummary;
use super::report::SessionReport;
use super::repository::{Repository, RepositoryError};

/// Service composing the repository with the derivation engine. Mutations
/// append to the log under the lock; queries clone a snapshot and run the
/// pure engine over it, so no derivation ever observes a half-applied write.
pub struct SessionService {
    repository: Arc<Mutex<Repository>>,
}

static REPLY_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static EVENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static VACCINATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reply_id() -> ReplyId {
    let id = REPLY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReplyId(format!("reply-{id:06}"))
}

fn next_event_id() -> EventId {
    let id = EVENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EventId(format!("event-{id:06}"))
}

fn next_vaccination_id() -> VaccinationId {
    let id = VACCINATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    VaccinationId(format!("vaccination-{id:06}"))
}

/// Incoming consent reply before the service assigns an id and timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReply {
    pub patient: PatientId,
    pub programme: ProgrammeId,
    pub decision: ConsentDecision,
    #[serde(default)]
    pub respondent: Respondent,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default = "default_delivered")]
    pub delivered: bool,
    #[serde(default)]
    pub answers: Option<BTreeMap<String, HealthAnswer>>,
}

fn default_delivered() -> bool {
    true
}

/// Incoming triage decision or note.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTriageNote {
    pub patient: PatientId,
    pub programme: ProgrammeId,
    #[serde(default)]
    pub outcome: Option<ScreenOutcome>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Incoming patient-specific direction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInstruction {
    pub patient: PatientId,
    pub programme: ProgrammeId,
    #[serde(default)]
    pub note: Option<String>,
}

/// Incoming vaccination record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVaccination {
    pub patient: PatientId,
    pub programme: ProgrammeId,
    pub outcome: VaccinationOutcome,
    #[serde(default)]
    pub method: Option<VaccineMethod>,
    #[serde(default)]
    pub dose: Option<usize>,
}

/// Incoming register write for the session day.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationUpdate {
    pub patient: PatientId,
    pub status: RegistrationOutcome,
}

/// Error raised by the session service.
#[derive(Debug, thiserror::Error)]
pub enum SessionServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("session {0} does not offer programme {1}")]
    ProgrammeNotOffered(String, String),
    #[error("registration can only be set to present or absent, got {requested:?}")]
    InvalidRegistration { requested: RegistrationOutcome },
}

impl SessionService {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
        }
    }

    /// Clone the current state as an independent snapshot.
    pub fn snapshot(&self) -> Repository {
        self.lock().clone()
    }

    /// Append a consent reply and return the statuses derived from the
    /// post-append snapshot.
    pub fn append_reply(
        &self,
        session: &SessionId,
        new: NewReply,
        recorded_at: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<StatusSet, SessionServiceError> {
        let reply = Reply {
            id: next_reply_id(),
            patient: new.patient.clone(),
            programme: new.programme.clone(),
            session: session.clone(),
            decision: new.decision,
            respondent: new.respondent,
            invalid: false,
            confirmed: new.confirmed,
            delivered: new.delivered,
            answers: new.answers,
            created_at: recorded_at,
        };

        let mut repository = self.lock();
        require_offered(&repository, session, &reply.programme)?;
        repository.append_reply(reply.clone())?;
        tracing::info!(
            reply = %reply.id.0,
            patient = %reply.patient.0,
            decision = ?reply.decision,
            "consent reply appended"
        );
        Ok(engine::derive(
            &repository,
            &new.patient,
            session,
            &new.programme,
            today,
        ))
    }

    /// Flag a reply invalid; the next derivation ignores it as if it never
    /// existed.
    pub fn invalidate_reply(&self, id: &ReplyId) -> Result<(), SessionServiceError> {
        self.lock().invalidate_reply(id)?;
        Ok(())
    }

    pub fn append_triage_note(
        &self,
        session: &SessionId,
        new: NewTriageNote,
        recorded_at: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<StatusSet, SessionServiceError> {
        let event = AuditEvent {
            id: next_event_id(),
            patient: new.patient.clone(),
            programme: Some(new.programme.clone()),
            kind: AuditEventKind::Triage,
            note: new.note,
            outcome: new.outcome,
            invalid: false,
            created_at: recorded_at,
        };
        self.append_scoped_event(session, &new.patient, &new.programme, event, today)
    }

    pub fn append_instruction(
        &self,
        session: &SessionId,
        new: NewInstruction,
        recorded_at: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<StatusSet, SessionServiceError> {
        let event = AuditEvent {
            id: next_event_id(),
            patient: new.patient.clone(),
            programme: Some(new.programme.clone()),
            kind: AuditEventKind::Instruction,
            note: new.note,
            outcome: None,
            invalid: false,
            created_at: recorded_at,
        };
        self.append_scoped_event(session, &new.patient, &new.programme, event, today)
    }

    pub fn record_vaccination(
        &self,
        session: &SessionId,
        new: NewVaccination,
        recorded_at: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<StatusSet, SessionServiceError> {
        let vaccination = Vaccination {
            id: next_vaccination_id(),
            patient: new.patient.clone(),
            programme: new.programme.clone(),
            session: session.clone(),
            outcome: new.outcome,
            method: new.method,
            dose: new.dose,
            invalid: false,
            created_at: recorded_at,
        };

        let mut repository = self.lock();
        require_offered(&repository, session, &vaccination.programme)?;
        repository.append_vaccination(vaccination.clone())?;
        tracing::info!(
            vaccination = %vaccination.id.0,
            patient = %vaccination.patient.0,
            outcome = ?vaccination.outcome,
            "vaccination recorded"
        );
        Ok(engine::derive(
            &repository,
            &new.patient,
            session,
            &new.programme,
            today,
        ))
    }

    /// Explicit clinician register action. Only Present and Absent may be
    /// written: Pending is the initial state (no way back) and Complete is
    /// derived from the recorded outcome, never stored.
    pub fn set_registration(
        &self,
        session: &SessionId,
        update: RegistrationUpdate,
    ) -> Result<(), SessionServiceError> {
        if !matches!(
            update.status,
            RegistrationOutcome::Present | RegistrationOutcome::Absent
        ) {
            return Err(SessionServiceError::InvalidRegistration {
                requested: update.status,
            });
        }
        self.lock()
            .write_register(session, &update.patient, update.status)?;
        Ok(())
    }

    /// Derive the full status set for one patient-session. Unlike the
    /// engine's defensive read path this reports unknown ids as errors.
    pub fn patient_status(
        &self,
        patient: &PatientId,
        session: &SessionId,
        programme: &ProgrammeId,
        today: NaiveDate,
    ) -> Result<StatusSet, SessionServiceError> {
        let repository = self.snapshot();
        let patient_session = repository
            .patient_session(patient, session, programme)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "patient-session",
                id: format!("{}/{}/{}", patient.0, session.0, programme.0),
            })?;
        Ok(engine::derive_for(&patient_session, today))
    }

    pub fn session_report(
        &self,
        session: &SessionId,
        programme: &ProgrammeId,
        today: NaiveDate,
    ) -> Result<SessionReportSummary, SessionServiceError> {
        let repository = self.snapshot();
        let report = SessionReport::build(&repository, session, programme, today).ok_or_else(
            || RepositoryError::NotFound {
                entity: "session-programme",
                id: format!("{}/{}", session.0, programme.0),
            },
        )?;
        Ok(report.summary())
    }

    fn append_scoped_event(
        &self,
        session: &SessionId,
        patient: &PatientId,
        programme: &ProgrammeId,
        event: AuditEvent,
        today: NaiveDate,
    ) -> Result<StatusSet, SessionServiceError> {
        let mut repository = self.lock();
        require_offered(&repository, session, programme)?;
        repository.append_event(event)?;
        Ok(engine::derive(&repository, patient, session, programme, today))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Repository> {
        self.repository.lock().expect("repository mutex poisoned")
    }
}

fn require_offered(
    repository: &Repository,
    session: &SessionId,
    programme: &ProgrammeId,
) -> Result<(), SessionServiceError> {
    let session = repository
        .session(session)
        .ok_or_else(|| RepositoryError::NotFound {
            entity: "session",
            id: session.0.clone(),
        })?;
    if !session.offers(programme) {
        return Err(SessionServiceError::ProgrammeNotOffered(
            session.id.0.clone(),
            programme.0.clone(),
        ));
    }
    Ok(())
}
