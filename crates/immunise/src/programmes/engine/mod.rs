//! The status-derivation engine: pure functions over a repository snapshot.
//!
//! Each resolver is an explicit ordered rule list, independently testable;
//! [`derive`] composes them in dependency order (session → consent →
//! screening → method → instruction → outcome → registration → activity).
//! Nothing here mutates the snapshot or caches a result, so recomputing is
//! always safe and always consistent.

mod consent;
mod instruction;
mod method;
mod outcome;
mod registration;
mod screening;
mod session;

pub use consent::consent_outcome;
pub use instruction::instruction_outcome;
pub use method::vaccine_method;
pub use outcome::{next_activity, programme_outcome};
pub use registration::registration_outcome;
pub use screening::{answers_need_triage, screen_outcome, triage_outcome, UMBRELLA_QUESTION};
pub use session::{consent_window, session_status};

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{
    Activity, ConsentOutcome, ConsentWindow, InstructionOutcome, PatientId, ProgrammeId,
    ProgrammeOutcome, RegistrationOutcome, ScreenOutcome, SessionId, SessionStatus, TriageOutcome,
    VaccineMethod,
};
use super::repository::{PatientSession, Repository};

/// The full set of derived workflow statuses for one patient-session. All
/// values are plain enumerations, safe to serialize straight into status
/// badges or export columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusSet {
    pub session_status: SessionStatus,
    pub consent_window: ConsentWindow,
    pub consent: ConsentOutcome,
    pub screen: Option<ScreenOutcome>,
    pub triage: TriageOutcome,
    pub method: Option<VaccineMethod>,
    pub instruction: InstructionOutcome,
    pub registration: RegistrationOutcome,
    pub outcome: ProgrammeOutcome,
    pub next_activity: Activity,
}

impl StatusSet {
    /// The degraded value returned when a relation no longer resolves, so a
    /// defensive render of a partial list never panics.
    fn unknown() -> Self {
        Self {
            session_status: SessionStatus::Unplanned,
            consent_window: ConsentWindow::None,
            consent: ConsentOutcome::NoResponse,
            screen: None,
            triage: TriageOutcome::NotNeeded,
            method: None,
            instruction: InstructionOutcome::NotNeeded,
            registration: RegistrationOutcome::Pending,
            outcome: ProgrammeOutcome::NoOutcomeYet,
            next_activity: Activity::Consent,
        }
    }
}

/// Recompute every status for the given patient × session × programme at
/// `today`. Absent relations degrade to [`StatusSet::unknown`] rather than
/// failing a read path.
pub fn derive(
    repository: &Repository,
    patient: &PatientId,
    session: &SessionId,
    programme: &ProgrammeId,
    today: NaiveDate,
) -> StatusSet {
    match repository.patient_session(patient, session, programme) {
        Some(patient_session) => derive_for(&patient_session, today),
        None => {
            tracing::warn!(
                patient = %patient.0,
                session = %session.0,
                programme = %programme.0,
                "patient-session does not resolve; returning unknown statuses"
            );
            StatusSet::unknown()
        }
    }
}

/// Derivation over an already-resolved join view.
pub fn derive_for(patient_session: &PatientSession<'_>, today: NaiveDate) -> StatusSet {
    let replies = patient_session.replies();
    let triage_events = patient_session.triage_events();
    let instruction_events = patient_session.instruction_events();
    let vaccinations = patient_session.vaccinations();

    let session_status = session::session_status(patient_session.session, today);
    let consent_window = session::consent_window(patient_session.session, today);
    let consent = consent::consent_outcome(patient_session.programme, &replies);
    let screen = screening::screen_outcome(consent, &replies, &triage_events);
    let triage = screening::triage_outcome(screen);
    let method = method::vaccine_method(patient_session.programme, consent, screen, &replies);
    let instruction = instruction::instruction_outcome(
        patient_session.programme,
        consent,
        screen,
        &instruction_events,
    );
    let outcome = outcome::programme_outcome(consent, screen, &vaccinations);
    let registration =
        registration::registration_outcome(patient_session.session, &patient_session.patient.id, outcome);
    let next_activity = outcome::next_activity(consent, screen, outcome);

    StatusSet {
        session_status,
        consent_window,
        consent,
        screen,
        triage,
        method,
        instruction,
        registration,
        outcome,
        next_activity,
    }
}
