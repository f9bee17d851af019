use super::common::*;
use crate::programmes::domain::{
    Activity, ConsentDecision, ConsentOutcome, ConsentWindow, InstructionOutcome, PatientId,
    ProgrammeId, ProgrammeOutcome, RegistrationOutcome, ScreenOutcome, SessionId, SessionStatus,
    TriageOutcome, VaccinationOutcome, VaccineMethod,
};
use crate::programmes::engine::derive;

fn ids() -> (PatientId, SessionId, ProgrammeId) {
    (
        PatientId("p-001".to_string()),
        SessionId(SESSION.to_string()),
        ProgrammeId(FLU.to_string()),
    )
}

#[test]
fn derive_composes_the_full_status_set() {
    let mut repository = seeded_repository();
    let mut consent = reply("r-1", "p-001", ConsentDecision::Given, 0);
    consent.answers = Some(answers(&[("allergies", true)]));
    repository.append_reply(consent).expect("reply appends");
    repository
        .append_event(triage_event(
            "e-1",
            "p-001",
            Some(ScreenOutcome::Vaccinate),
            10,
        ))
        .expect("triage event appends");

    let (patient, session, programme) = ids();
    let statuses = derive(&repository, &patient, &session, &programme, today());

    assert_eq!(statuses.session_status, SessionStatus::Planned);
    assert_eq!(statuses.consent_window, ConsentWindow::Open);
    assert_eq!(statuses.consent, ConsentOutcome::Given);
    assert_eq!(statuses.screen, Some(ScreenOutcome::Vaccinate));
    assert_eq!(statuses.triage, TriageOutcome::Completed);
    assert_eq!(statuses.method, Some(VaccineMethod::Nasal));
    assert_eq!(statuses.instruction, InstructionOutcome::Needed);
    assert_eq!(statuses.registration, RegistrationOutcome::Pending);
    assert_eq!(statuses.outcome, ProgrammeOutcome::NoOutcomeYet);
    assert_eq!(statuses.next_activity, Activity::Record);
}

#[test]
fn derivation_is_idempotent_over_an_unchanged_snapshot() {
    let mut repository = seeded_repository();
    repository
        .append_reply(reply("r-1", "p-001", ConsentDecision::Given, 0))
        .expect("reply appends");
    repository
        .append_vaccination(vaccination(
            "v-1",
            "p-001",
            VaccinationOutcome::Vaccinated,
            20,
        ))
        .expect("vaccination appends");

    let (patient, session, programme) = ids();
    let first = derive(&repository, &patient, &session, &programme, today());
    let second = derive(&repository, &patient, &session, &programme, today());

    assert_eq!(first, second);
    assert_eq!(first.outcome, ProgrammeOutcome::Vaccinated);
    assert_eq!(first.registration, RegistrationOutcome::Complete);
    assert_eq!(first.next_activity, Activity::Report);
}

#[test]
fn absent_relations_degrade_instead_of_panicking() {
    let repository = seeded_repository();
    let statuses = derive(
        &repository,
        &PatientId("p-001".to_string()),
        &SessionId("missing-session".to_string()),
        &ProgrammeId(FLU.to_string()),
        today(),
    );

    assert_eq!(statuses.consent, ConsentOutcome::NoResponse);
    assert_eq!(statuses.screen, None);
    assert_eq!(statuses.outcome, ProgrammeOutcome::NoOutcomeYet);
    assert_eq!(statuses.next_activity, Activity::Consent);
}

#[test]
fn invalidated_replies_vanish_from_the_derivation() {
    let mut repository = seeded_repository();
    repository
        .append_reply(reply("r-1", "p-001", ConsentDecision::Given, 0))
        .expect("first reply appends");
    repository
        .append_reply(reply("r-2", "p-001", ConsentDecision::Refused, 5))
        .expect("second reply appends");

    let (patient, session, programme) = ids();
    let conflicted = derive(&repository, &patient, &session, &programme, today());
    assert_eq!(conflicted.consent, ConsentOutcome::Inconsistent);

    repository
        .invalidate_reply(&crate::programmes::domain::ReplyId("r-2".to_string()))
        .expect("reply invalidates");

    let resolved = derive(&repository, &patient, &session, &programme, today());
    assert_eq!(resolved.consent, ConsentOutcome::Given);
}

#[test]
fn events_scoped_to_another_programme_are_ignored() {
    let mut repository = seeded_repository();
    let mut consent = reply("r-1", "p-001", ConsentDecision::Given, 0);
    consent.answers = Some(answers(&[("allergies", true)]));
    repository.append_reply(consent).expect("reply appends");

    let mut foreign = triage_event("e-1", "p-001", Some(ScreenOutcome::Vaccinate), 10);
    foreign.programme = Some(ProgrammeId(HPV.to_string()));
    repository.append_event(foreign).expect("event appends");

    let (patient, session, programme) = ids();
    let statuses = derive(&repository, &patient, &session, &programme, today());

    assert_eq!(statuses.screen, Some(ScreenOutcome::NeedsTriage));
    assert_eq!(statuses.next_activity, Activity::Triage);
}

#[test]
fn instruction_event_satisfies_the_instruction_outcome() {
    let mut repository = seeded_repository();
    repository
        .append_reply(reply("r-1", "p-001", ConsentDecision::Given, 0))
        .expect("reply appends");

    let mut event = triage_event("e-1", "p-001", None, 10);
    event.kind = crate::programmes::domain::AuditEventKind::Instruction;
    repository.append_event(event).expect("event appends");

    let (patient, session, programme) = ids();
    let statuses = derive(&repository, &patient, &session, &programme, today());

    assert_eq!(statuses.instruction, InstructionOutcome::Given);
}
