use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use immunise::error::AppError;
use immunise::programmes::{
    ConsentDecision, ConsentWindowPolicy, HealthAnswer, NewReply, NewTriageNote, NewVaccination,
    Respondent, ScreenOutcome, SessionService, StatusSet, VaccinationOutcome, VaccineMethod,
};

use crate::infra::{demo_seed, DemoSeed};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date for the demo (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SessionReportArgs {
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Emit the per-patient rows as CSV instead of JSON
    #[arg(long)]
    pub(crate) csv: bool,
}

fn print_statuses(step: &str, statuses: &StatusSet) {
    println!("\n{step}");
    println!("- consent: {}", statuses.consent.label());
    println!("- triage: {}", statuses.triage.label());
    println!("- registration: {}", statuses.registration.label());
    println!("- outcome: {}", statuses.outcome.label());
    println!("- next activity: {}", statuses.next_activity.label());
}

/// Scripted walk through a session day: consent with flagged answers, a
/// triage decision, conflicting parents, a confirmed refusal, and a recorded
/// vaccination, printing the derived statuses after each append.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let DemoSeed {
        repository,
        session,
        flu,
        patients,
        ..
    } = demo_seed(ConsentWindowPolicy::default(), today);
    let service = SessionService::new(repository);

    println!("Immunisation status engine demo ({today})");

    let mut answers = BTreeMap::new();
    answers.insert("allergies".to_string(), HealthAnswer::Yes { details: None });
    let statuses = service.append_reply(
        &session,
        NewReply {
            patient: patients[0].clone(),
            programme: flu.clone(),
            decision: ConsentDecision::Given,
            respondent: Respondent::Parent,
            confirmed: false,
            delivered: true,
            answers: Some(answers),
        },
        Utc::now(),
        today,
    )?;
    print_statuses("Parent consents for Ada, flagging an allergy", &statuses);

    let statuses = service.append_triage_note(
        &session,
        NewTriageNote {
            patient: patients[0].clone(),
            programme: flu.clone(),
            outcome: Some(ScreenOutcome::Vaccinate),
            note: Some("Allergy is seasonal, no contraindication".to_string()),
        },
        Utc::now(),
        today,
    )?;
    print_statuses("Nurse triages Ada as safe to vaccinate", &statuses);

    let statuses = service.record_vaccination(
        &session,
        NewVaccination {
            patient: patients[0].clone(),
            programme: flu.clone(),
            outcome: VaccinationOutcome::Vaccinated,
            method: Some(VaccineMethod::Nasal),
            dose: Some(1),
        },
        Utc::now(),
        today,
    )?;
    print_statuses("Ada's vaccination is recorded", &statuses);

    service.append_reply(
        &session,
        NewReply {
            patient: patients[1].clone(),
            programme: flu.clone(),
            decision: ConsentDecision::Given,
            respondent: Respondent::Parent,
            confirmed: false,
            delivered: true,
            answers: None,
        },
        Utc::now(),
        today,
    )?;
    let statuses = service.append_reply(
        &session,
        NewReply {
            patient: patients[1].clone(),
            programme: flu.clone(),
            decision: ConsentDecision::Refused,
            respondent: Respondent::Parent,
            confirmed: false,
            delivered: true,
            answers: None,
        },
        Utc::now(),
        today,
    )?;
    print_statuses("Billy's parents disagree", &statuses);

    let statuses = service.append_reply(
        &session,
        NewReply {
            patient: patients[2].clone(),
            programme: flu.clone(),
            decision: ConsentDecision::Refused,
            respondent: Respondent::Parent,
            confirmed: true,
            delivered: true,
            answers: None,
        },
        Utc::now(),
        today,
    )?;
    print_statuses("Chloe's refusal is confirmed after follow-up", &statuses);

    let summary = service.session_report(&session, &flu, today)?;
    println!("\nEnd-of-day report for {}:", summary.session.0);
    for entry in &summary.activity_tallies {
        println!("- {}: {}", entry.activity_label, entry.count);
    }
    for entry in &summary.outcome_tallies {
        println!("- {}: {}", entry.outcome_label, entry.count);
    }

    Ok(())
}

/// Print the session report for the seeded demo session without starting the
/// HTTP server.
pub(crate) fn run_session_report(args: SessionReportArgs) -> Result<(), AppError> {
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let DemoSeed {
        repository,
        session,
        flu,
        ..
    } = demo_seed(ConsentWindowPolicy::default(), today);
    let service = SessionService::new(repository);

    let summary = service.session_report(&session, &flu, today)?;

    if args.csv {
        let bytes = summary
            .to_csv()
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        print!("{}", String::from_utf8_lossy(&bytes));
    } else {
        let rendered = serde_json::to_string_pretty(&summary)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    }

    Ok(())
}
