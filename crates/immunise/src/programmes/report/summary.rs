use std::collections::HashMap;

use chrono::NaiveDate;

use super::super::domain::{
    Activity, ConsentOutcome, ConsentWindow, ProgrammeId, ProgrammeOutcome, SessionId,
    SessionStatus, VaccineMethod,
};
use super::super::engine;
use super::super::repository::Repository;
use super::views::{
    ActivityTallyEntry, ConsentTallyEntry, OutcomeTallyEntry, PatientRowView, SessionReportSummary,
};

/// Per-session report over a snapshot: outcome tallies plus the flattened
/// per-patient rows. Fully recomputed on every build; nothing is cached.
#[derive(Debug)]
pub struct SessionReport {
    session: SessionId,
    programme: ProgrammeId,
    date: NaiveDate,
    session_status: SessionStatus,
    consent_window: ConsentWindow,
    consent: HashMap<ConsentOutcome, usize>,
    activities: HashMap<Activity, usize>,
    outcomes: HashMap<ProgrammeOutcome, usize>,
    rows: Vec<PatientRowView>,
}

impl SessionReport {
    /// Build the report for one session/programme pair. Returns `None` when
    /// either id does not resolve, so callers can surface a not-found.
    pub fn build(
        repository: &Repository,
        session_id: &SessionId,
        programme_id: &ProgrammeId,
        today: NaiveDate,
    ) -> Option<Self> {
        let session = repository.session(session_id)?;
        repository.programme(programme_id)?;

        let mut report = Self {
            session: session_id.clone(),
            programme: programme_id.clone(),
            date: today,
            session_status: engine::session_status(session, today),
            consent_window: engine::consent_window(session, today),
            consent: HashMap::new(),
            activities: HashMap::new(),
            outcomes: HashMap::new(),
            rows: Vec::new(),
        };

        for patient_id in &session.cohort {
            let Some(patient) = repository.patient(patient_id) else {
                tracing::warn!(patient = %patient_id.0, "cohort patient missing from repository");
                continue;
            };
            let statuses = engine::derive(repository, patient_id, session_id, programme_id, today);

            *report.consent.entry(statuses.consent).or_default() += 1;
            *report.activities.entry(statuses.next_activity).or_default() += 1;
            *report.outcomes.entry(statuses.outcome).or_default() += 1;

            report.rows.push(PatientRowView {
                patient: patient_id.clone(),
                patient_name: patient.full_name.clone(),
                consent: statuses.consent,
                consent_label: statuses.consent.label(),
                triage: statuses.triage,
                triage_label: statuses.triage.label(),
                registration: statuses.registration,
                registration_label: statuses.registration.label(),
                outcome: statuses.outcome,
                outcome_label: statuses.outcome.label(),
                next_activity: statuses.next_activity,
                next_activity_label: statuses.next_activity.label(),
                method: statuses.method,
            });
        }

        report.rows.sort_by(|a, b| a.patient.cmp(&b.patient));
        Some(report)
    }

    pub fn summary(&self) -> SessionReportSummary {
        let consent_tallies = ConsentOutcome::ordered()
            .into_iter()
            .filter_map(|outcome| {
                self.consent.get(&outcome).map(|count| ConsentTallyEntry {
                    outcome,
                    outcome_label: outcome.label(),
                    count: *count,
                })
            })
            .collect();

        let activity_tallies = Activity::ordered()
            .into_iter()
            .filter_map(|activity| {
                self.activities
                    .get(&activity)
                    .map(|count| ActivityTallyEntry {
                        activity,
                        activity_label: activity.label(),
                        count: *count,
                    })
            })
            .collect();

        let outcome_tallies = ProgrammeOutcome::ordered()
            .into_iter()
            .filter_map(|outcome| {
                self.outcomes.get(&outcome).map(|count| OutcomeTallyEntry {
                    outcome,
                    outcome_label: outcome.label(),
                    count: *count,
                })
            })
            .collect();

        let needs_triage = self
            .rows
            .iter()
            .filter(|row| row.next_activity == Activity::Triage)
            .map(|row| row.patient.clone())
            .collect();

        SessionReportSummary {
            session: self.session.clone(),
            programme: self.programme.clone(),
            date: self.date,
            session_status: self.session_status,
            session_status_label: self.session_status.label(),
            consent_window: self.consent_window,
            consent_window_label: self.consent_window.label(),
            cohort_size: self.rows.len(),
            consent_tallies,
            activity_tallies,
            outcome_tallies,
            needs_triage,
            rows: self.rows.clone(),
        }
    }
}

impl SessionReportSummary {
    /// Render the per-patient rows as CSV, one column per status badge.
    pub fn to_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "patient_id",
            "patient_name",
            "consent",
            "triage",
            "registration",
            "outcome",
            "next_activity",
            "method",
        ])?;

        for row in &self.rows {
            writer.write_record([
                row.patient.0.as_str(),
                row.patient_name.as_str(),
                row.consent_label,
                row.triage_label,
                row.registration_label,
                row.outcome_label,
                row.next_activity_label,
                row.method.map(VaccineMethod::label).unwrap_or(""),
            ])?;
        }

        Ok(writer.into_inner().map_err(|err| err.into_error())?)
    }
}
