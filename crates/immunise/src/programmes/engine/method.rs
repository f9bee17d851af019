use super::super::domain::{
    ConsentDecision, ConsentOutcome, Programme, Reply, ScreenOutcome, VaccineMethod,
};

/// Resolve which vaccine method applies for this patient.
///
/// Consulted both before recording a vaccination and again when building the
/// final report, because a screening decision made after initial consent can
/// override the method the parents agreed to. `None` means no method can be
/// selected yet (consent is not in a given state).
pub fn vaccine_method(
    programme: &Programme,
    consent: ConsentOutcome,
    screen: Option<ScreenOutcome>,
    replies: &[&Reply],
) -> Option<VaccineMethod> {
    if !consent.is_given() {
        return None;
    }

    let Some(alternative) = programme.alternative_method else {
        return Some(programme.standard_method);
    };

    if screen == Some(ScreenOutcome::VaccinateWithAlternative) {
        return Some(alternative);
    }

    let mut delivered = replies.iter().filter(|reply| reply.delivered).peekable();
    if delivered.peek().is_some()
        && delivered.all(|reply| reply.decision == ConsentDecision::OnlyAlternative)
    {
        return Some(alternative);
    }

    Some(programme.standard_method)
}
