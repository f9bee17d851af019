use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrappers for the entities held in the repository arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgrammeId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReplyId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VaccinationId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaccineType {
    SeasonalFlu,
    Hpv,
    MenAcwy,
    TdIpv,
}

impl VaccineType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SeasonalFlu => "Seasonal flu",
            Self::Hpv => "HPV",
            Self::MenAcwy => "MenACWY",
            Self::TdIpv => "Td/IPV",
        }
    }
}

/// How a vaccine is administered. Programmes with an alternative carry both a
/// standard and a fallback method (e.g. nasal flu with an injected fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaccineMethod {
    Nasal,
    Injection,
}

impl VaccineMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nasal => "Nasal spray",
            Self::Injection => "Injection",
        }
    }
}

/// A vaccination programme offered to a school cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Programme {
    pub id: ProgrammeId,
    pub name: String,
    pub vaccine: VaccineType,
    pub standard_method: VaccineMethod,
    pub alternative_method: Option<VaccineMethod>,
    pub dose_sequence: Vec<String>,
    /// Whether a patient-specific direction must be in place before a
    /// non-prescriber may administer this vaccine.
    pub requires_instruction: bool,
}

impl Programme {
    pub fn offers_alternative(&self) -> bool {
        self.alternative_method.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    School,
    Clinic,
}

impl SessionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::School => "School session",
            Self::Clinic => "Community clinic",
        }
    }
}

/// Offsets (in days) relative to a session's first and last dates that bound
/// its consent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentWindowPolicy {
    pub open_offset_days: i64,
    pub close_offset_days: i64,
}

impl Default for ConsentWindowPolicy {
    fn default() -> Self {
        Self {
            open_offset_days: 21,
            close_offset_days: 1,
        }
    }
}

/// A scheduled visit to a school or clinic.
///
/// `dates` is either empty (unplanned) or chronologically sorted with no
/// duplicates; the register map only ever holds explicitly written
/// attendance values, never the derived Complete state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub kind: SessionKind,
    pub location: String,
    pub dates: Vec<NaiveDate>,
    pub closed: bool,
    pub registration_enabled: bool,
    pub window: ConsentWindowPolicy,
    pub programmes: Vec<ProgrammeId>,
    pub cohort: Vec<PatientId>,
    pub register: BTreeMap<PatientId, RegistrationOutcome>,
}

impl Session {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn offers(&self, programme: &ProgrammeId) -> bool {
        self.programmes.contains(programme)
    }
}

/// A child eligible for one or more programmes. The reply, event and
/// vaccination id lists preserve append order, which is what makes
/// "most recent, ties to the later append" well-defined downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub programmes: Vec<ProgrammeId>,
    pub replies: Vec<ReplyId>,
    pub events: Vec<EventId>,
    pub vaccinations: Vec<VaccinationId>,
}

/// The decision carried by a single consent reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentDecision {
    NoResponse,
    Given,
    OnlyAlternative,
    Declined,
    Refused,
}

impl ConsentDecision {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoResponse => "No response",
            Self::Given => "Consent given",
            Self::OnlyAlternative => "Consent given for alternative only",
            Self::Declined => "Declined",
            Self::Refused => "Refused",
        }
    }
}

/// Who answered the consent request. A Gillick-competent child answering for
/// themselves outranks any parental reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Respondent {
    Parent,
    Child,
}

impl Default for Respondent {
    fn default() -> Self {
        Self::Parent
    }
}

/// One answer to a health question on a consent form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "answer")]
pub enum HealthAnswer {
    Yes {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    No,
}

impl HealthAnswer {
    pub fn needs_triage(&self) -> bool {
        matches!(self, Self::Yes { .. })
    }
}

/// One parent/guardian or self-consent response to a consent request.
///
/// Replies are append-only; an edit in the source system shows up here as the
/// old reply flagged `invalid` plus a fresh reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: ReplyId,
    pub patient: PatientId,
    pub programme: ProgrammeId,
    pub session: SessionId,
    pub decision: ConsentDecision,
    pub respondent: Respondent,
    pub invalid: bool,
    pub confirmed: bool,
    pub delivered: bool,
    pub answers: Option<BTreeMap<String, HealthAnswer>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    Triage,
    Notice,
    Reminder,
    Instruction,
    Pin,
}

/// An entry in a patient's append-only event log. Triage decisions carry a
/// [`ScreenOutcome`]; notices, reminders, instructions and pins do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: EventId,
    pub patient: PatientId,
    pub programme: Option<ProgrammeId>,
    pub kind: AuditEventKind,
    pub note: Option<String>,
    pub outcome: Option<ScreenOutcome>,
    pub invalid: bool,
    pub created_at: DateTime<Utc>,
}

/// The clinical screening decision for a patient within a programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenOutcome {
    NeedsTriage,
    Vaccinate,
    VaccinateWithAlternative,
    DelayVaccination,
    DoNotVaccinate,
}

impl ScreenOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeedsTriage => "Needs triage",
            Self::Vaccinate => "Safe to vaccinate",
            Self::VaccinateWithAlternative => "Safe to vaccinate with alternative method",
            Self::DelayVaccination => "Delay vaccination",
            Self::DoNotVaccinate => "Do not vaccinate",
        }
    }

    pub const fn forbids_vaccination(self) -> bool {
        matches!(self, Self::DoNotVaccinate)
    }
}

/// View over the screening outcome used by triage worklists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageOutcome {
    Needed,
    Completed,
    NotNeeded,
}

impl TriageOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Needed => "Triage needed",
            Self::Completed => "Triage completed",
            Self::NotNeeded => "No triage needed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaccinationOutcome {
    Vaccinated,
    PartVaccinated,
    AlreadyVaccinated,
    Contraindications,
    Refused,
    Absent,
    Unwell,
}

impl VaccinationOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vaccinated => "Vaccinated",
            Self::PartVaccinated => "Partially vaccinated",
            Self::AlreadyVaccinated => "Already had the vaccine",
            Self::Contraindications => "Had contraindications",
            Self::Refused => "Refused vaccine",
            Self::Absent => "Absent from the session",
            Self::Unwell => "Unwell",
        }
    }

    /// Whether the record counts as the vaccine having been given.
    pub const fn administered(self) -> bool {
        matches!(
            self,
            Self::Vaccinated | Self::PartVaccinated | Self::AlreadyVaccinated
        )
    }
}

/// A recorded vaccination attempt, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vaccination {
    pub id: VaccinationId,
    pub patient: PatientId,
    pub programme: ProgrammeId,
    pub session: SessionId,
    pub outcome: VaccinationOutcome,
    pub method: Option<VaccineMethod>,
    pub dose: Option<usize>,
    pub invalid: bool,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a session derived from its date list and closed flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Closed,
    Unplanned,
    Completed,
    Planned,
}

impl SessionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Closed => "Closed",
            Self::Unplanned => "No sessions scheduled",
            Self::Completed => "All sessions completed",
            Self::Planned => "Sessions scheduled",
        }
    }
}

/// Where a session sits relative to its consent request window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentWindow {
    Opening,
    Open,
    Closed,
    None,
}

impl ConsentWindow {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Opening => "Consent window opening soon",
            Self::Open => "Consent window open",
            Self::Closed => "Consent window closed",
            Self::None => "No consent window",
        }
    }
}

/// The single consent position reconciled from all replies for a
/// patient/programme pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentOutcome {
    NoRequest,
    NoResponse,
    Inconsistent,
    Given,
    GivenForAlternative,
    Declined,
    Refused,
    FinalRefusal,
}

impl ConsentOutcome {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::NoRequest,
            Self::NoResponse,
            Self::Inconsistent,
            Self::Given,
            Self::GivenForAlternative,
            Self::Declined,
            Self::Refused,
            Self::FinalRefusal,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NoRequest => "Request not delivered",
            Self::NoResponse => "No response",
            Self::Inconsistent => "Conflicting consent",
            Self::Given => "Consent given",
            Self::GivenForAlternative => "Consent given for alternative method",
            Self::Declined => "Follow up requested",
            Self::Refused => "Consent refused",
            Self::FinalRefusal => "Refusal confirmed",
        }
    }

    pub const fn is_given(self) -> bool {
        matches!(self, Self::Given | Self::GivenForAlternative)
    }

    pub const fn is_refused(self) -> bool {
        matches!(self, Self::Refused | Self::FinalRefusal)
    }
}

/// Same-day attendance state for a patient at a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Pending,
    Present,
    Absent,
    Complete,
}

impl RegistrationOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Not registered yet",
            Self::Present => "Attending",
            Self::Absent => "Absent",
            Self::Complete => "Completed",
        }
    }
}

/// Whether a patient-specific direction is in place for programmes that need
/// one before a non-prescriber may vaccinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionOutcome {
    NotNeeded,
    Needed,
    Given,
}

impl InstructionOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotNeeded => "No instruction needed",
            Self::Needed => "Instruction needed",
            Self::Given => "Instruction given",
        }
    }
}

/// Overall per-programme report outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgrammeOutcome {
    NoOutcomeYet,
    Vaccinated,
    CouldNotVaccinate,
}

impl ProgrammeOutcome {
    pub const fn ordered() -> [Self; 3] {
        [Self::NoOutcomeYet, Self::Vaccinated, Self::CouldNotVaccinate]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NoOutcomeYet => "No outcome yet",
            Self::Vaccinated => "Vaccinated",
            Self::CouldNotVaccinate => "Could not vaccinate",
        }
    }
}

/// The single next activity a clinician must perform for a patient. Every
/// list and filter view in the surrounding application keys off this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    DoNotRecord,
    Consent,
    Triage,
    Report,
    Record,
}

impl Activity {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Consent,
            Self::Triage,
            Self::Record,
            Self::Report,
            Self::DoNotRecord,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DoNotRecord => "Do not vaccinate",
            Self::Consent => "Get consent",
            Self::Triage => "Triage health answers",
            Self::Report => "Report vaccination",
            Self::Record => "Record vaccination",
        }
    }
}
