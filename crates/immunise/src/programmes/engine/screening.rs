use super::super::domain::{AuditEvent, ConsentOutcome, Reply, ScreenOutcome, TriageOutcome};

/// The umbrella asthma question is always present on flu consent forms; only
/// its sub-questions indicate anything a nurse needs to look at.
pub const UMBRELLA_QUESTION: &str = "asthma";

/// Whether any delivered reply carries a health answer a nurse must review.
pub fn answers_need_triage(replies: &[&Reply]) -> bool {
    replies
        .iter()
        .filter(|reply| reply.delivered)
        .filter_map(|reply| reply.answers.as_ref())
        .any(|answers| {
            answers
                .iter()
                .any(|(question, answer)| question != UMBRELLA_QUESTION && answer.needs_triage())
        })
}

/// Derive the screening outcome from consent state, health answers and the
/// time-ordered triage event log. `None` means screening is not applicable
/// (no consent, or nothing to screen and no decision on file).
///
/// A later triage event always supersedes an earlier one, so a clinician can
/// revise a "keep in triage" decision to "safe to vaccinate" afterwards.
pub fn screen_outcome(
    consent: ConsentOutcome,
    replies: &[&Reply],
    triage_events: &[&AuditEvent],
) -> Option<ScreenOutcome> {
    if !consent.is_given() {
        return None;
    }

    if answers_need_triage(replies) {
        let decision = triage_events.iter().rev().find_map(|event| event.outcome);
        return Some(decision.unwrap_or(ScreenOutcome::NeedsTriage));
    }

    // Nothing flagged for review: only an explicit decision on the most
    // recent triage event counts.
    triage_events.last().and_then(|event| event.outcome)
}

/// View over the screening outcome used by triage worklists.
pub fn triage_outcome(screen: Option<ScreenOutcome>) -> TriageOutcome {
    match screen {
        Some(ScreenOutcome::NeedsTriage) => TriageOutcome::Needed,
        Some(_) => TriageOutcome::Completed,
        None => TriageOutcome::NotNeeded,
    }
}
