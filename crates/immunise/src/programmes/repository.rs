use std::collections::BTreeMap;

use super::domain::{
    AuditEvent, AuditEventKind, EventId, Patient, PatientId, Programme, ProgrammeId,
    RegistrationOutcome, Reply, ReplyId, Session, SessionId, Vaccination, VaccinationId,
};

/// In-memory arena of entities keyed by stable ids, with all relations
/// resolved by explicit lookup. Cloning yields an independent snapshot, which
/// is how callers hand the pure engine a consistent view.
#[derive(Debug, Default, Clone)]
pub struct Repository {
    programmes: BTreeMap<ProgrammeId, Programme>,
    sessions: BTreeMap<SessionId, Session>,
    patients: BTreeMap<PatientId, Patient>,
    replies: BTreeMap<ReplyId, Reply>,
    events: BTreeMap<EventId, AuditEvent>,
    vaccinations: BTreeMap<VaccinationId, Vaccination>,
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} {id} already exists")]
    Conflict { entity: &'static str, id: String },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
}

impl RepositoryError {
    fn conflict(entity: &'static str, id: &str) -> Self {
        Self::Conflict {
            entity,
            id: id.to_string(),
        }
    }

    fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl Repository {
    pub fn add_programme(&mut self, programme: Programme) -> Result<(), RepositoryError> {
        if self.programmes.contains_key(&programme.id) {
            return Err(RepositoryError::conflict("programme", &programme.id.0));
        }
        self.programmes.insert(programme.id.clone(), programme);
        Ok(())
    }

    pub fn add_session(&mut self, session: Session) -> Result<(), RepositoryError> {
        if self.sessions.contains_key(&session.id) {
            return Err(RepositoryError::conflict("session", &session.id.0));
        }
        for programme in &session.programmes {
            self.require_programme(programme)?;
        }
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    pub fn add_patient(&mut self, patient: Patient) -> Result<(), RepositoryError> {
        if self.patients.contains_key(&patient.id) {
            return Err(RepositoryError::conflict("patient", &patient.id.0));
        }
        for programme in &patient.programmes {
            self.require_programme(programme)?;
        }
        self.patients.insert(patient.id.clone(), patient);
        Ok(())
    }

    pub fn programme(&self, id: &ProgrammeId) -> Option<&Programme> {
        self.programmes.get(id)
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn patient(&self, id: &PatientId) -> Option<&Patient> {
        self.patients.get(id)
    }

    pub fn reply(&self, id: &ReplyId) -> Option<&Reply> {
        self.replies.get(id)
    }

    pub fn event(&self, id: &EventId) -> Option<&AuditEvent> {
        self.events.get(id)
    }

    pub fn vaccination(&self, id: &VaccinationId) -> Option<&Vaccination> {
        self.vaccinations.get(id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// Append a consent reply to the patient's log.
    pub fn append_reply(&mut self, reply: Reply) -> Result<(), RepositoryError> {
        if self.replies.contains_key(&reply.id) {
            return Err(RepositoryError::conflict("reply", &reply.id.0));
        }
        self.require_programme(&reply.programme)?;
        self.require_session(&reply.session)?;
        let patient = self.require_patient_mut(&reply.patient)?;
        patient.replies.push(reply.id.clone());
        self.replies.insert(reply.id.clone(), reply);
        Ok(())
    }

    /// Editing a reply is modelled as invalidating the old one and appending
    /// a replacement; history itself is never rewritten.
    pub fn invalidate_reply(&mut self, id: &ReplyId) -> Result<(), RepositoryError> {
        let reply = self
            .replies
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found("reply", &id.0))?;
        reply.invalid = true;
        Ok(())
    }

    pub fn append_event(&mut self, event: AuditEvent) -> Result<(), RepositoryError> {
        if self.events.contains_key(&event.id) {
            return Err(RepositoryError::conflict("event", &event.id.0));
        }
        if let Some(programme) = &event.programme {
            self.require_programme(programme)?;
        }
        let patient = self.require_patient_mut(&event.patient)?;
        patient.events.push(event.id.clone());
        self.events.insert(event.id.clone(), event);
        Ok(())
    }

    pub fn append_vaccination(&mut self, vaccination: Vaccination) -> Result<(), RepositoryError> {
        if self.vaccinations.contains_key(&vaccination.id) {
            return Err(RepositoryError::conflict("vaccination", &vaccination.id.0));
        }
        self.require_programme(&vaccination.programme)?;
        self.require_session(&vaccination.session)?;
        let patient = self.require_patient_mut(&vaccination.patient)?;
        patient.vaccinations.push(vaccination.id.clone());
        self.vaccinations
            .insert(vaccination.id.clone(), vaccination);
        Ok(())
    }

    /// Write an attendance value to a session's register map.
    pub fn write_register(
        &mut self,
        session: &SessionId,
        patient: &PatientId,
        status: RegistrationOutcome,
    ) -> Result<(), RepositoryError> {
        self.require_patient(patient)?;
        let session = self
            .sessions
            .get_mut(session)
            .ok_or_else(|| RepositoryError::not_found("session", &session.0))?;
        session.register.insert(patient.clone(), status);
        Ok(())
    }

    /// Resolve the patient × programme × session join the engine operates on.
    /// Returns `None` when any relation is absent.
    pub fn patient_session<'a>(
        &'a self,
        patient: &PatientId,
        session: &SessionId,
        programme: &ProgrammeId,
    ) -> Option<PatientSession<'a>> {
        Some(PatientSession {
            repository: self,
            patient: self.patients.get(patient)?,
            session: self.sessions.get(session)?,
            programme: self.programmes.get(programme)?,
        })
    }

    fn require_programme(&self, id: &ProgrammeId) -> Result<&Programme, RepositoryError> {
        self.programmes
            .get(id)
            .ok_or_else(|| RepositoryError::not_found("programme", &id.0))
    }

    fn require_session(&self, id: &SessionId) -> Result<&Session, RepositoryError> {
        self.sessions
            .get(id)
            .ok_or_else(|| RepositoryError::not_found("session", &id.0))
    }

    fn require_patient(&self, id: &PatientId) -> Result<&Patient, RepositoryError> {
        self.patients
            .get(id)
            .ok_or_else(|| RepositoryError::not_found("patient", &id.0))
    }

    fn require_patient_mut(&mut self, id: &PatientId) -> Result<&mut Patient, RepositoryError> {
        self.patients
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found("patient", &id.0))
    }
}

/// The per-programme, per-session view of one patient. Accessors return the
/// non-invalid subsets of the patient's log scoped to this programme, in
/// timestamp order with ties kept in append order (stable sort over the
/// append-ordered id lists).
#[derive(Debug, Clone, Copy)]
pub struct PatientSession<'a> {
    repository: &'a Repository,
    pub patient: &'a Patient,
    pub session: &'a Session,
    pub programme: &'a Programme,
}

impl<'a> PatientSession<'a> {
    pub fn replies(&self) -> Vec<&'a Reply> {
        let mut replies: Vec<&Reply> = self
            .patient
            .replies
            .iter()
            .filter_map(|id| self.repository.replies.get(id))
            .filter(|reply| !reply.invalid && reply.programme == self.programme.id)
            .collect();
        replies.sort_by_key(|reply| reply.created_at);
        replies
    }

    pub fn triage_events(&self) -> Vec<&'a AuditEvent> {
        self.events_of_kind(AuditEventKind::Triage)
    }

    pub fn instruction_events(&self) -> Vec<&'a AuditEvent> {
        self.events_of_kind(AuditEventKind::Instruction)
    }

    pub fn vaccinations(&self) -> Vec<&'a Vaccination> {
        let mut vaccinations: Vec<&Vaccination> = self
            .patient
            .vaccinations
            .iter()
            .filter_map(|id| self.repository.vaccinations.get(id))
            .filter(|record| !record.invalid && record.programme == self.programme.id)
            .collect();
        vaccinations.sort_by_key(|record| record.created_at);
        vaccinations
    }

    fn events_of_kind(&self, kind: AuditEventKind) -> Vec<&'a AuditEvent> {
        let mut events: Vec<&AuditEvent> = self
            .patient
            .events
            .iter()
            .filter_map(|id| self.repository.events.get(id))
            .filter(|event| {
                !event.invalid
                    && event.kind == kind
                    && event
                        .programme
                        .as_ref()
                        .map_or(true, |scope| *scope == self.programme.id)
            })
            .collect();
        events.sort_by_key(|event| event.created_at);
        events
    }
}
