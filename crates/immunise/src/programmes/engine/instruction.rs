use super::super::domain::{
    AuditEvent, ConsentOutcome, InstructionOutcome, Programme, ScreenOutcome,
};

/// Whether a patient-specific direction is in place for programmes that need
/// one. An instruction only becomes outstanding once vaccination is actually
/// in prospect: consent given and screening not forbidding it.
pub fn instruction_outcome(
    programme: &Programme,
    consent: ConsentOutcome,
    screen: Option<ScreenOutcome>,
    instruction_events: &[&AuditEvent],
) -> InstructionOutcome {
    if !programme.requires_instruction {
        return InstructionOutcome::NotNeeded;
    }
    if !consent.is_given() || screen.is_some_and(ScreenOutcome::forbids_vaccination) {
        return InstructionOutcome::NotNeeded;
    }
    if instruction_events.is_empty() {
        InstructionOutcome::Needed
    } else {
        InstructionOutcome::Given
    }
}
