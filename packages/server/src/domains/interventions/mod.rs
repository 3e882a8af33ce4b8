//! Interventions domain - lifecycle state machine, splitting, permissions
//!
//! Models own the SQL (including the guarded status updates), `machines`
//! owns the transition graph, actions drive the workflow, effects run the
//! post-commit notifications and activity log.

pub mod actions;
pub mod effects;
pub mod events;
pub mod machines;
pub mod models;
pub mod permissions;

// Re-export commonly used types
pub use models::{Assignment, ConfirmationStatus, Intervention, InterventionStatus, ParticipantRole};
pub use permissions::{resolve_participant_permissions, ParticipantPermissions};
