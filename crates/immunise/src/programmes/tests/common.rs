use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::programmes::domain::{
    AuditEvent, AuditEventKind, ConsentDecision, ConsentWindowPolicy, EventId, HealthAnswer,
    Patient, PatientId, Programme, ProgrammeId, Reply, ReplyId, Respondent, ScreenOutcome,
    Session, SessionId, SessionKind, Vaccination, VaccinationId, VaccinationOutcome, VaccineMethod,
    VaccineType,
};
use crate::programmes::repository::Repository;
use crate::programmes::service::SessionService;

pub(super) const FLU: &str = "flu-2025";
pub(super) const HPV: &str = "hpv-2025";
pub(super) const SESSION: &str = "autumn-term";

/// Nasal-first programme with an injected fallback, the shape that exercises
/// every branch of the method selector.
pub(super) fn flu_programme() -> Programme {
    Programme {
        id: ProgrammeId(FLU.to_string()),
        name: "Children's flu".to_string(),
        vaccine: VaccineType::SeasonalFlu,
        standard_method: VaccineMethod::Nasal,
        alternative_method: Some(VaccineMethod::Injection),
        dose_sequence: vec!["1".to_string()],
        requires_instruction: true,
    }
}

pub(super) fn hpv_programme() -> Programme {
    Programme {
        id: ProgrammeId(HPV.to_string()),
        name: "HPV".to_string(),
        vaccine: VaccineType::Hpv,
        standard_method: VaccineMethod::Injection,
        alternative_method: None,
        dose_sequence: vec!["1".to_string(), "2".to_string()],
        requires_instruction: false,
    }
}

pub(super) fn session_dates() -> Vec<NaiveDate> {
    vec![date(2025, 1, 10), date(2025, 1, 17)]
}

pub(super) fn school_session(cohort: &[&str]) -> Session {
    Session {
        id: SessionId(SESSION.to_string()),
        kind: SessionKind::School,
        location: "Whitfield Academy".to_string(),
        dates: session_dates(),
        closed: false,
        registration_enabled: true,
        window: ConsentWindowPolicy::default(),
        programmes: vec![ProgrammeId(FLU.to_string()), ProgrammeId(HPV.to_string())],
        cohort: cohort.iter().map(|id| PatientId(id.to_string())).collect(),
        register: BTreeMap::new(),
    }
}

pub(super) fn patient(id: &str, name: &str) -> Patient {
    Patient {
        id: PatientId(id.to_string()),
        full_name: name.to_string(),
        date_of_birth: date(2014, 6, 1),
        programmes: vec![ProgrammeId(FLU.to_string()), ProgrammeId(HPV.to_string())],
        replies: Vec::new(),
        events: Vec::new(),
        vaccinations: Vec::new(),
    }
}

pub(super) fn seeded_repository() -> Repository {
    let mut repository = Repository::default();
    repository
        .add_programme(flu_programme())
        .expect("flu programme inserts");
    repository
        .add_programme(hpv_programme())
        .expect("hpv programme inserts");
    repository
        .add_session(school_session(&["p-001", "p-002"]))
        .expect("session inserts");
    repository
        .add_patient(patient("p-001", "Ada Okafor"))
        .expect("first patient inserts");
    repository
        .add_patient(patient("p-002", "Billy Reid"))
        .expect("second patient inserts");
    repository
}

pub(super) fn seeded_service() -> SessionService {
    SessionService::new(seeded_repository())
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// A day inside the consent window and before the first session date.
pub(super) fn today() -> NaiveDate {
    date(2025, 1, 5)
}

/// Event timestamps ticked forward a minute at a time.
pub(super) fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap() + Duration::minutes(minute as i64)
}

pub(super) fn reply(id: &str, patient: &str, decision: ConsentDecision, minute: u32) -> Reply {
    Reply {
        id: ReplyId(id.to_string()),
        patient: PatientId(patient.to_string()),
        programme: ProgrammeId(FLU.to_string()),
        session: SessionId(SESSION.to_string()),
        decision,
        respondent: Respondent::Parent,
        invalid: false,
        confirmed: false,
        delivered: true,
        answers: None,
        created_at: at(minute),
    }
}

pub(super) fn answers(entries: &[(&str, bool)]) -> BTreeMap<String, HealthAnswer> {
    entries
        .iter()
        .map(|(question, yes)| {
            let answer = if *yes {
                HealthAnswer::Yes { details: None }
            } else {
                HealthAnswer::No
            };
            (question.to_string(), answer)
        })
        .collect()
}

pub(super) fn triage_event(
    id: &str,
    patient: &str,
    outcome: Option<ScreenOutcome>,
    minute: u32,
) -> AuditEvent {
    AuditEvent {
        id: EventId(id.to_string()),
        patient: PatientId(patient.to_string()),
        programme: Some(ProgrammeId(FLU.to_string())),
        kind: AuditEventKind::Triage,
        note: None,
        outcome,
        invalid: false,
        created_at: at(minute),
    }
}

pub(super) fn vaccination(
    id: &str,
    patient: &str,
    outcome: VaccinationOutcome,
    minute: u32,
) -> Vaccination {
    Vaccination {
        id: VaccinationId(id.to_string()),
        patient: PatientId(patient.to_string()),
        programme: ProgrammeId(FLU.to_string()),
        session: SessionId(SESSION.to_string()),
        outcome,
        method: Some(VaccineMethod::Nasal),
        dose: Some(1),
        invalid: false,
        created_at: at(minute),
    }
}
