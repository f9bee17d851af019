//! Status-derivation engine for school-aged immunisation programmes.
//!
//! Everything the surrounding application shows about a patient — consent,
//! triage, vaccine method, registration, the overall outcome and the next
//! thing a clinician should do — is recomputed on demand from the append-only
//! event history held in [`programmes::Repository`]. No derived state is ever
//! stored.

pub mod config;
pub mod error;
pub mod programmes;
pub mod telemetry;
