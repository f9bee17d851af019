use super::super::domain::{
    Activity, ConsentOutcome, ProgrammeOutcome, ScreenOutcome, TriageOutcome, Vaccination,
};
use super::screening::triage_outcome;

/// Overall per-programme report outcome. Terminal conditions are checked
/// first so that appending further events never walks a settled outcome back
/// to a transient state.
pub fn programme_outcome(
    consent: ConsentOutcome,
    screen: Option<ScreenOutcome>,
    vaccinations: &[&Vaccination],
) -> ProgrammeOutcome {
    if let Some(latest) = vaccinations.last() {
        return if latest.outcome.administered() {
            ProgrammeOutcome::Vaccinated
        } else {
            ProgrammeOutcome::CouldNotVaccinate
        };
    }
    if consent.is_refused() {
        return ProgrammeOutcome::CouldNotVaccinate;
    }
    if screen == Some(ScreenOutcome::DoNotVaccinate) {
        return ProgrammeOutcome::CouldNotVaccinate;
    }
    ProgrammeOutcome::NoOutcomeYet
}

/// The single "what happens next" signal the surrounding application routes
/// on. The rule order is the contract; no rule may be reordered without a
/// policy change.
pub fn next_activity(
    consent: ConsentOutcome,
    screen: Option<ScreenOutcome>,
    outcome: ProgrammeOutcome,
) -> Activity {
    if consent.is_refused() {
        return Activity::DoNotRecord;
    }
    if !consent.is_given() {
        return Activity::Consent;
    }
    if triage_outcome(screen) == TriageOutcome::Needed {
        return Activity::Triage;
    }
    if screen == Some(ScreenOutcome::DoNotVaccinate) {
        return Activity::DoNotRecord;
    }
    if outcome == ProgrammeOutcome::Vaccinated {
        return Activity::Report;
    }
    Activity::Record
}
