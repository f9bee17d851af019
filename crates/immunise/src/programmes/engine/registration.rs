use super::super::domain::{PatientId, ProgrammeOutcome, RegistrationOutcome, Session};

/// Same-day attendance state for a patient at a session.
///
/// Sessions that skip the registration gate treat everyone as present. Once
/// the overall outcome is Vaccinated the registration is Complete no matter
/// what was last written to the register; there is no way back to Pending.
pub fn registration_outcome(
    session: &Session,
    patient: &PatientId,
    outcome: ProgrammeOutcome,
) -> RegistrationOutcome {
    if !session.registration_enabled {
        return RegistrationOutcome::Present;
    }
    if outcome == ProgrammeOutcome::Vaccinated {
        return RegistrationOutcome::Complete;
    }
    session
        .register
        .get(patient)
        .copied()
        .unwrap_or(RegistrationOutcome::Pending)
}
