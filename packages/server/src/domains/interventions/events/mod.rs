use serde::{Deserialize, Serialize};

use crate::common::{AssignmentId, InterventionId, UserId};
use crate::domains::interventions::models::InterventionStatus;

/// Intervention domain events - FACT EVENTS ONLY
///
/// Immutable facts about committed state changes. The outbox worker hands
/// them to the effect handler for activity logging and notifications.
/// Errors go in Result::Err, not in events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InterventionEvent {
    /// The intervention moved to a new status
    StatusChanged {
        intervention_id: InterventionId,
        from: InterventionStatus,
        to: InterventionStatus,
        changed_by: UserId,
        reason: Option<String>,
        internal_note: Option<String>,
    },

    /// The primary provider accepted the proposed schedule
    ScheduleAccepted {
        intervention_id: InterventionId,
        provider_id: UserId,
    },

    /// A multi-provider intervention was split into per-provider children
    Split {
        parent_id: InterventionId,
        child_ids: Vec<InterventionId>,
        actor: UserId,
        parent_cancelled: bool,
    },

    /// A participant confirmed or declined their assignment
    ParticipationResolved {
        intervention_id: InterventionId,
        assignment_id: AssignmentId,
        user_id: UserId,
        accepted: bool,
    },
}
