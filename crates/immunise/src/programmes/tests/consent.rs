use super::common::*;
use crate::programmes::domain::{ConsentDecision, ConsentOutcome, Respondent};
use crate::programmes::engine::consent_outcome;

#[test]
fn no_replies_means_no_response() {
    let programme = flu_programme();

    assert_eq!(consent_outcome(&programme, &[]), ConsentOutcome::NoResponse);
}

#[test]
fn single_undelivered_reply_means_no_request() {
    let programme = flu_programme();
    let mut reply = reply("r-1", "p-001", ConsentDecision::Given, 0);
    reply.delivered = false;

    assert_eq!(
        consent_outcome(&programme, &[&reply]),
        ConsentOutcome::NoRequest
    );
}

#[test]
fn single_given_reply_maps_to_given() {
    let programme = flu_programme();
    let reply = reply("r-1", "p-001", ConsentDecision::Given, 0);

    assert_eq!(consent_outcome(&programme, &[&reply]), ConsentOutcome::Given);
}

#[test]
fn refusal_promotes_to_final_only_when_confirmed() {
    let programme = flu_programme();
    let mut reply = reply("r-1", "p-001", ConsentDecision::Refused, 0);

    assert_eq!(
        consent_outcome(&programme, &[&reply]),
        ConsentOutcome::Refused
    );

    reply.confirmed = true;
    assert_eq!(
        consent_outcome(&programme, &[&reply]),
        ConsentOutcome::FinalRefusal
    );
}

#[test]
fn alternative_only_decision_maps_per_programme() {
    let reply = reply("r-1", "p-001", ConsentDecision::OnlyAlternative, 0);

    // The flu programme offers an injected fallback; HPV does not, so the
    // same decision collapses to plain consent there.
    assert_eq!(
        consent_outcome(&flu_programme(), &[&reply]),
        ConsentOutcome::GivenForAlternative
    );
    assert_eq!(
        consent_outcome(&hpv_programme(), &[&reply]),
        ConsentOutcome::Given
    );
}

#[test]
fn all_undelivered_replies_mean_no_request() {
    let programme = flu_programme();
    let mut first = reply("r-1", "p-001", ConsentDecision::Given, 0);
    let mut second = reply("r-2", "p-001", ConsentDecision::Refused, 1);
    first.delivered = false;
    second.delivered = false;

    assert_eq!(
        consent_outcome(&programme, &[&first, &second]),
        ConsentOutcome::NoRequest
    );
}

#[test]
fn agreeing_replies_resolve_like_a_single_reply() {
    let programme = flu_programme();
    let first = reply("r-1", "p-001", ConsentDecision::Given, 0);
    let second = reply("r-2", "p-001", ConsentDecision::Given, 5);

    assert_eq!(
        consent_outcome(&programme, &[&first, &second]),
        ConsentOutcome::Given
    );
}

#[test]
fn newest_agreeing_refusal_carries_the_confirmed_flag() {
    let programme = flu_programme();
    let first = reply("r-1", "p-001", ConsentDecision::Refused, 0);
    let mut second = reply("r-2", "p-001", ConsentDecision::Refused, 5);
    second.confirmed = true;

    assert_eq!(
        consent_outcome(&programme, &[&first, &second]),
        ConsentOutcome::FinalRefusal
    );
}

#[test]
fn conflicting_parent_replies_are_inconsistent() {
    let programme = flu_programme();
    let given = reply("r-1", "p-001", ConsentDecision::Given, 0);
    let refused = reply("r-2", "p-001", ConsentDecision::Refused, 5);

    assert_eq!(
        consent_outcome(&programme, &[&given, &refused]),
        ConsentOutcome::Inconsistent
    );
}

#[test]
fn undelivered_replies_do_not_create_conflicts() {
    let programme = flu_programme();
    let given = reply("r-1", "p-001", ConsentDecision::Given, 0);
    let mut refused = reply("r-2", "p-001", ConsentDecision::Refused, 5);
    refused.delivered = false;

    assert_eq!(
        consent_outcome(&programme, &[&given, &refused]),
        ConsentOutcome::Given
    );
}

#[test]
fn self_consenting_child_overrides_parents() {
    let programme = flu_programme();
    let parent = reply("r-1", "p-001", ConsentDecision::Refused, 0);
    let mut child = reply("r-2", "p-001", ConsentDecision::Given, 5);
    child.respondent = Respondent::Child;

    assert_eq!(
        consent_outcome(&programme, &[&parent, &child]),
        ConsentOutcome::Given
    );

    // Order of arrival does not matter; the child's decision still wins.
    assert_eq!(
        consent_outcome(&programme, &[&child, &parent]),
        ConsentOutcome::Given
    );
}

#[test]
fn declined_wins_over_inconsistent() {
    let programme = flu_programme();
    let given = reply("r-1", "p-001", ConsentDecision::Given, 0);
    let declined = reply("r-2", "p-001", ConsentDecision::Declined, 5);
    let refused = reply("r-3", "p-001", ConsentDecision::Refused, 10);

    assert_eq!(
        consent_outcome(&programme, &[&given, &declined, &refused]),
        ConsentOutcome::Declined
    );
}

#[test]
fn three_way_conflict_without_decline_is_inconsistent() {
    let programme = flu_programme();
    let given = reply("r-1", "p-001", ConsentDecision::Given, 0);
    let refused = reply("r-2", "p-001", ConsentDecision::Refused, 5);
    let alternative = reply("r-3", "p-001", ConsentDecision::OnlyAlternative, 10);

    assert_eq!(
        consent_outcome(&programme, &[&given, &refused, &alternative]),
        ConsentOutcome::Inconsistent
    );
}

#[test]
fn latest_child_reply_wins_when_several_exist() {
    let programme = flu_programme();
    let mut early_child = reply("r-1", "p-001", ConsentDecision::Refused, 0);
    early_child.respondent = Respondent::Child;
    let parent = reply("r-2", "p-001", ConsentDecision::Given, 5);
    let mut late_child = reply("r-3", "p-001", ConsentDecision::Given, 10);
    late_child.respondent = Respondent::Child;

    assert_eq!(
        consent_outcome(&programme, &[&early_child, &parent, &late_child]),
        ConsentOutcome::Given
    );
}
