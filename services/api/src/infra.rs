use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use immunise::programmes::{
    ConsentWindowPolicy, Patient, PatientId, Programme, ProgrammeId, Repository, Session,
    SessionId, SessionKind, VaccineMethod, VaccineType,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fixture entities the service starts with so the derivation endpoints have
/// something to derive over. Real deployments hydrate the repository from an
/// upstream record store instead.
pub(crate) struct DemoSeed {
    pub(crate) repository: Repository,
    pub(crate) session: SessionId,
    pub(crate) flu: ProgrammeId,
    pub(crate) hpv: ProgrammeId,
    pub(crate) patients: Vec<PatientId>,
}

pub(crate) fn demo_seed(window: ConsentWindowPolicy, today: NaiveDate) -> DemoSeed {
    let flu = ProgrammeId("flu-2025".to_string());
    let hpv = ProgrammeId("hpv-2025".to_string());
    let session = SessionId("oakwood-spring".to_string());
    let patients = vec![
        PatientId("p-001".to_string()),
        PatientId("p-002".to_string()),
        PatientId("p-003".to_string()),
    ];

    let mut repository = Repository::default();
    repository
        .add_programme(Programme {
            id: flu.clone(),
            name: "Children's flu".to_string(),
            vaccine: VaccineType::SeasonalFlu,
            standard_method: VaccineMethod::Nasal,
            alternative_method: Some(VaccineMethod::Injection),
            dose_sequence: vec!["1".to_string()],
            requires_instruction: true,
        })
        .expect("flu programme inserts into empty repository");
    repository
        .add_programme(Programme {
            id: hpv.clone(),
            name: "HPV".to_string(),
            vaccine: VaccineType::Hpv,
            standard_method: VaccineMethod::Injection,
            alternative_method: None,
            dose_sequence: vec!["1".to_string()],
            requires_instruction: false,
        })
        .expect("hpv programme inserts into empty repository");
    repository
        .add_session(Session {
            id: session.clone(),
            kind: SessionKind::School,
            location: "Oakwood Primary".to_string(),
            dates: vec![today + Duration::days(7), today + Duration::days(14)],
            closed: false,
            registration_enabled: true,
            window,
            programmes: vec![flu.clone(), hpv.clone()],
            cohort: patients.clone(),
            register: BTreeMap::new(),
        })
        .expect("session inserts into empty repository");

    let names = ["Ada Okafor", "Billy Reid", "Chloe Zhang"];
    for (patient, name) in patients.iter().zip(names) {
        repository
            .add_patient(Patient {
                id: patient.clone(),
                full_name: name.to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(2014, 6, 1).expect("valid date"),
                programmes: vec![flu.clone(), hpv.clone()],
                replies: Vec::new(),
                events: Vec::new(),
                vaccinations: Vec::new(),
            })
            .expect("patient inserts into empty repository");
    }

    DemoSeed {
        repository,
        session,
        flu,
        hpv,
        patients,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
