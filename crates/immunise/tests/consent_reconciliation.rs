use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use immunise::programmes::{
    Activity, ConsentDecision, ConsentOutcome, ConsentWindowPolicy, NewReply, Patient, PatientId,
    Programme, ProgrammeId, ProgrammeOutcome, Repository, Respondent, Session, SessionId,
    SessionKind, SessionService, VaccineMethod, VaccineType,
};

fn hpv() -> ProgrammeId {
    ProgrammeId("hpv-2025".to_string())
}

fn session_id() -> SessionId {
    SessionId("summer-term".to_string())
}

fn pupil() -> PatientId {
    PatientId("p-200".to_string())
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")
}

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap() + Duration::minutes(minute as i64)
}

fn new_reply(decision: ConsentDecision, respondent: Respondent) -> NewReply {
    NewReply {
        patient: pupil(),
        programme: hpv(),
        decision,
        respondent,
        confirmed: false,
        delivered: true,
        answers: None,
    }
}

fn seeded_service() -> SessionService {
    let mut repository = Repository::default();
    repository
        .add_programme(Programme {
            id: hpv(),
            name: "HPV".to_string(),
            vaccine: VaccineType::Hpv,
            standard_method: VaccineMethod::Injection,
            alternative_method: None,
            dose_sequence: vec!["1".to_string()],
            requires_instruction: false,
        })
        .expect("programme inserts");
    repository
        .add_session(Session {
            id: session_id(),
            kind: SessionKind::School,
            location: "Hillcrest Secondary".to_string(),
            dates: vec![today() + Duration::days(10)],
            closed: false,
            registration_enabled: false,
            window: ConsentWindowPolicy::default(),
            programmes: vec![hpv()],
            cohort: vec![pupil()],
            register: BTreeMap::new(),
        })
        .expect("session inserts");
    repository
        .add_patient(Patient {
            id: pupil(),
            full_name: "Theo Marsh".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2012, 9, 14).expect("valid date"),
            programmes: vec![hpv()],
            replies: Vec::new(),
            events: Vec::new(),
            vaccinations: Vec::new(),
        })
        .expect("patient inserts");
    SessionService::new(repository)
}

#[test]
fn disagreeing_parents_surface_as_inconsistent_until_resolved() {
    let service = seeded_service();

    service
        .append_reply(
            &session_id(),
            new_reply(ConsentDecision::Given, Respondent::Parent),
            at(0),
            today(),
        )
        .expect("first reply appends");
    let statuses = service
        .append_reply(
            &session_id(),
            new_reply(ConsentDecision::Refused, Respondent::Parent),
            at(10),
            today(),
        )
        .expect("second reply appends");

    // The engine never guesses between disagreeing parents; the conflict is
    // surfaced for a human to chase.
    assert_eq!(statuses.consent, ConsentOutcome::Inconsistent);
    assert_eq!(statuses.next_activity, Activity::Consent);
    assert_eq!(statuses.outcome, ProgrammeOutcome::NoOutcomeYet);
}

#[test]
fn a_gillick_competent_pupil_settles_the_disagreement() {
    let service = seeded_service();

    service
        .append_reply(
            &session_id(),
            new_reply(ConsentDecision::Refused, Respondent::Parent),
            at(0),
            today(),
        )
        .expect("parent reply appends");
    let statuses = service
        .append_reply(
            &session_id(),
            new_reply(ConsentDecision::Given, Respondent::Child),
            at(10),
            today(),
        )
        .expect("child reply appends");

    assert_eq!(statuses.consent, ConsentOutcome::Given);
    assert_eq!(statuses.next_activity, Activity::Record);
}

#[test]
fn a_follow_up_request_outranks_the_conflict_label() {
    let service = seeded_service();

    service
        .append_reply(
            &session_id(),
            new_reply(ConsentDecision::Given, Respondent::Parent),
            at(0),
            today(),
        )
        .expect("first reply appends");
    let statuses = service
        .append_reply(
            &session_id(),
            new_reply(ConsentDecision::Declined, Respondent::Parent),
            at(10),
            today(),
        )
        .expect("declined reply appends");

    assert_eq!(statuses.consent, ConsentOutcome::Declined);
    assert_eq!(statuses.next_activity, Activity::Consent);
}

#[test]
fn confirmed_refusal_is_terminal_for_the_programme() {
    let service = seeded_service();

    let mut refusal = new_reply(ConsentDecision::Refused, Respondent::Parent);
    refusal.confirmed = true;
    let statuses = service
        .append_reply(&session_id(), refusal, at(0), today())
        .expect("refusal appends");

    assert_eq!(statuses.consent, ConsentOutcome::FinalRefusal);
    assert_eq!(statuses.outcome, ProgrammeOutcome::CouldNotVaccinate);
    assert_eq!(statuses.next_activity, Activity::DoNotRecord);
}

#[test]
fn invalidating_a_reply_recomputes_as_if_it_never_existed() {
    let service = seeded_service();

    service
        .append_reply(
            &session_id(),
            new_reply(ConsentDecision::Given, Respondent::Parent),
            at(0),
            today(),
        )
        .expect("first reply appends");
    service
        .append_reply(
            &session_id(),
            new_reply(ConsentDecision::Refused, Respondent::Parent),
            at(10),
            today(),
        )
        .expect("second reply appends");

    let conflicted = service
        .patient_status(&pupil(), &session_id(), &hpv(), today())
        .expect("status derives");
    assert_eq!(conflicted.consent, ConsentOutcome::Inconsistent);

    // Find the refusal in the snapshot and withdraw it.
    let snapshot = service.snapshot();
    let patient = snapshot.patient(&pupil()).expect("patient exists");
    let refusal = patient
        .replies
        .iter()
        .find(|id| {
            snapshot
                .reply(id)
                .is_some_and(|reply| reply.decision == ConsentDecision::Refused)
        })
        .expect("refusal present")
        .clone();
    service
        .invalidate_reply(&refusal)
        .expect("reply invalidates");

    let resolved = service
        .patient_status(&pupil(), &session_id(), &hpv(), today())
        .expect("status derives");
    assert_eq!(resolved.consent, ConsentOutcome::Given);
    assert_eq!(resolved.next_activity, Activity::Record);
}
