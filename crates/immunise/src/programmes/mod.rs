//! School-aged immunisation programmes: entities, the repository arena, the
//! pure status-derivation engine and the service/router surface around it.

pub mod domain;
pub mod engine;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Activity, AuditEvent, AuditEventKind, ConsentDecision, ConsentOutcome, ConsentWindow,
    ConsentWindowPolicy, EventId, HealthAnswer, InstructionOutcome, Patient, PatientId, Programme,
    ProgrammeId, ProgrammeOutcome, RegistrationOutcome, Reply, ReplyId, Respondent, ScreenOutcome,
    Session, SessionId, SessionKind, SessionStatus, TriageOutcome, Vaccination, VaccinationId,
    VaccinationOutcome, VaccineMethod, VaccineType,
};
pub use engine::{derive, derive_for, StatusSet};
pub use report::views::SessionReportSummary;
pub use report::SessionReport;
pub use repository::{PatientSession, Repository, RepositoryError};
pub use router::session_router;
pub use service::{
    NewInstruction, NewReply, NewTriageNote, NewVaccination, RegistrationUpdate, SessionService,
    SessionServiceError,
};
