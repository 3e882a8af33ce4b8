//! Intervention domain actions - business logic functions
//!
//! Actions validate against current state, apply the primary write (one
//! transaction when several rows move together) and publish a fact event to
//! the outbox only after the commit. They never wait on side effects.

mod accept_schedule;
mod advance;
mod cancel;
mod confirm;
mod reject;
mod split;

pub use accept_schedule::{accept_schedule, AcceptSchedule};
pub use advance::{advance_intervention, AdvanceIntervention};
pub use cancel::{cancel_intervention, CancelIntervention};
pub use confirm::{confirm_participation, ConfirmParticipation};
pub use reject::{reject_intervention, RejectIntervention};
pub use split::{split_intervention, SplitIntervention, SplitOutcome};
