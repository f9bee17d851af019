use chrono::NaiveDate;
use serde::Serialize;

use super::super::domain::{
    Activity, ConsentOutcome, ConsentWindow, PatientId, ProgrammeId, ProgrammeOutcome,
    RegistrationOutcome, SessionId, SessionStatus, TriageOutcome, VaccineMethod,
};

#[derive(Debug, Clone, Serialize)]
pub struct ConsentTallyEntry {
    pub outcome: ConsentOutcome,
    pub outcome_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityTallyEntry {
    pub activity: Activity,
    pub activity_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeTallyEntry {
    pub outcome: ProgrammeOutcome,
    pub outcome_label: &'static str,
    pub count: usize,
}

/// One patient's derived statuses flattened for a session worklist row.
#[derive(Debug, Clone, Serialize)]
pub struct PatientRowView {
    pub patient: PatientId,
    pub patient_name: String,
    pub consent: ConsentOutcome,
    pub consent_label: &'static str,
    pub triage: TriageOutcome,
    pub triage_label: &'static str,
    pub registration: RegistrationOutcome,
    pub registration_label: &'static str,
    pub outcome: ProgrammeOutcome,
    pub outcome_label: &'static str,
    pub next_activity: Activity,
    pub next_activity_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<VaccineMethod>,
}

/// Serializable session report, ready for a JSON response or CSV download.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReportSummary {
    pub session: SessionId,
    pub programme: ProgrammeId,
    pub date: NaiveDate,
    pub session_status: SessionStatus,
    pub session_status_label: &'static str,
    pub consent_window: ConsentWindow,
    pub consent_window_label: &'static str,
    pub cohort_size: usize,
    pub consent_tallies: Vec<ConsentTallyEntry>,
    pub activity_tallies: Vec<ActivityTallyEntry>,
    pub outcome_tallies: Vec<OutcomeTallyEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub needs_triage: Vec<PatientId>,
    pub rows: Vec<PatientRowView>,
}
