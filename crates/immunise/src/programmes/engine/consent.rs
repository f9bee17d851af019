use super::super::domain::{ConsentDecision, ConsentOutcome, Programme, Reply, Respondent};

/// Reconcile the non-invalid replies for one patient/programme pair into a
/// single [`ConsentOutcome`].
///
/// Callers supply replies in timestamp order (ties in append order), which is
/// what [`super::super::PatientSession::replies`] produces. The precedence
/// ladder for conflicting replies is policy, not tie-breaking convenience: a
/// competent child's own decision always overrides parents, and an explicit
/// request to discuss is surfaced rather than buried as "conflicting".
pub fn consent_outcome(programme: &Programme, replies: &[&Reply]) -> ConsentOutcome {
    match replies {
        [] => ConsentOutcome::NoResponse,
        [only] => single_reply_outcome(programme, only),
        _ => reconcile(programme, replies),
    }
}

fn single_reply_outcome(programme: &Programme, reply: &Reply) -> ConsentOutcome {
    if !reply.delivered {
        return ConsentOutcome::NoRequest;
    }
    decision_outcome(programme, reply)
}

fn decision_outcome(programme: &Programme, reply: &Reply) -> ConsentOutcome {
    match reply.decision {
        ConsentDecision::NoResponse => ConsentOutcome::NoResponse,
        ConsentDecision::Given => ConsentOutcome::Given,
        ConsentDecision::OnlyAlternative => {
            if programme.offers_alternative() {
                ConsentOutcome::GivenForAlternative
            } else {
                ConsentOutcome::Given
            }
        }
        ConsentDecision::Declined => ConsentOutcome::Declined,
        ConsentDecision::Refused => {
            if reply.confirmed {
                ConsentOutcome::FinalRefusal
            } else {
                ConsentOutcome::Refused
            }
        }
    }
}

fn reconcile(programme: &Programme, replies: &[&Reply]) -> ConsentOutcome {
    let delivered: Vec<&Reply> = replies.iter().copied().filter(|r| r.delivered).collect();
    let Some(latest) = delivered.last() else {
        return ConsentOutcome::NoRequest;
    };

    if delivered
        .iter()
        .all(|reply| reply.decision == latest.decision)
    {
        // The newest reply is the representative, so a later confirmation
        // can promote Refused to FinalRefusal.
        return decision_outcome(programme, latest);
    }

    if let Some(child) = delivered
        .iter()
        .rev()
        .find(|reply| reply.respondent == Respondent::Child)
    {
        return decision_outcome(programme, child);
    }

    if delivered
        .iter()
        .any(|reply| reply.decision == ConsentDecision::Declined)
    {
        return ConsentOutcome::Declined;
    }

    ConsentOutcome::Inconsistent
}
