//! Confirmation-gated participant permissions.
//!
//! Pure resolver: given an intervention, the caller's assignment (if any) and
//! whether the caller created the intervention, compute what they may do.
//! Capabilities shrink until a participant who must confirm actually has.

use serde::Serialize;

use crate::common::{DomainError, DomainResult};
use crate::domains::interventions::models::{Assignment, ConfirmationStatus, Intervention};

pub const REASON_NOT_ASSIGNED: &str = "not assigned to this intervention";
pub const REASON_CONFIRMATION_REQUIRED: &str = "confirmation required";
pub const REASON_PARTICIPATION_DECLINED: &str = "participation declined";

/// Capability set of one participant on one intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParticipantPermissions {
    pub can_interact: bool,
    pub can_confirm: bool,
    pub can_edit_schedule: bool,
    pub can_chat: bool,
    pub can_upload_documents: bool,
    pub can_manage_quotes: bool,
    pub reason: Option<&'static str>,
}

impl ParticipantPermissions {
    /// Everything allowed; nothing left to confirm.
    pub fn full_access() -> Self {
        Self {
            can_interact: true,
            can_confirm: false,
            can_edit_schedule: true,
            can_chat: true,
            can_upload_documents: true,
            can_manage_quotes: true,
            reason: None,
        }
    }

    /// No capability at all.
    pub fn no_access(reason: &'static str) -> Self {
        Self {
            can_interact: false,
            can_confirm: false,
            can_edit_schedule: false,
            can_chat: false,
            can_upload_documents: false,
            can_manage_quotes: false,
            reason: Some(reason),
        }
    }

    /// Awaiting the participant's confirmation: they may look, chat and
    /// confirm, nothing else.
    fn confirmation_pending() -> Self {
        Self {
            can_interact: true,
            can_confirm: true,
            can_edit_schedule: false,
            can_chat: true,
            can_upload_documents: false,
            can_manage_quotes: false,
            reason: Some(REASON_CONFIRMATION_REQUIRED),
        }
    }

    /// Participation declined: chat stays open so a replacement can be
    /// coordinated, everything else is closed.
    fn declined() -> Self {
        Self {
            can_interact: false,
            can_confirm: false,
            can_edit_schedule: false,
            can_chat: true,
            can_upload_documents: false,
            can_manage_quotes: false,
            reason: Some(REASON_PARTICIPATION_DECLINED),
        }
    }
}

/// Resolve the capability set of a participant.
///
/// Decision order matters: creator first, then the intervention-level gate,
/// then the assignment-level gate. A stored confirmation status outside the
/// closed vocabulary is a data error, never a grant.
pub fn resolve_participant_permissions(
    intervention: &Intervention,
    assignment: Option<&Assignment>,
    is_creator: bool,
) -> DomainResult<ParticipantPermissions> {
    if is_creator {
        return Ok(ParticipantPermissions::full_access());
    }

    if !intervention.requires_participant_confirmation {
        return Ok(ParticipantPermissions::full_access());
    }

    let assignment = match assignment {
        Some(assignment) => assignment,
        None => return Ok(ParticipantPermissions::no_access(REASON_NOT_ASSIGNED)),
    };

    let confirmation_status = assignment
        .confirmation_status()
        .map_err(|e| DomainError::Validation(e.to_string()))?;

    if !assignment.requires_confirmation || confirmation_status == ConfirmationStatus::NotRequired {
        return Ok(ParticipantPermissions::full_access());
    }

    Ok(match confirmation_status {
        ConfirmationStatus::Pending => ParticipantPermissions::confirmation_pending(),
        ConfirmationStatus::Confirmed => ParticipantPermissions::full_access(),
        ConfirmationStatus::Rejected => ParticipantPermissions::declined(),
        // handled above, kept for exhaustiveness
        ConfirmationStatus::NotRequired => ParticipantPermissions::full_access(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{AssignmentId, BuildingId, InterventionId, TeamId, UserId};
    use chrono::Utc;

    fn intervention(requires_confirmation: bool) -> Intervention {
        Intervention {
            id: InterventionId::new(),
            team_id: TeamId::new(),
            building_id: BuildingId::new(),
            lot_id: None,
            title: "Water damage in 3B".to_string(),
            description: None,
            status: "scheduling".to_string(),
            scheduled_date: None,
            requires_participant_confirmation: requires_confirmation,
            parent_intervention_id: None,
            created_by: UserId::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn assignment(requires_confirmation: bool, confirmation_status: &str) -> Assignment {
        Assignment {
            id: AssignmentId::new(),
            intervention_id: InterventionId::new(),
            user_id: UserId::new(),
            role: "provider".to_string(),
            is_primary: true,
            requires_confirmation,
            confirmation_status: confirmation_status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_creator_gets_full_access_regardless_of_confirmation() {
        let i = intervention(true);
        let a = assignment(true, "rejected");
        let perms = resolve_participant_permissions(&i, Some(&a), true).unwrap();
        assert_eq!(perms, ParticipantPermissions::full_access());
        assert!(!perms.can_confirm);
    }

    #[test]
    fn test_no_gate_on_intervention_means_full_access() {
        let i = intervention(false);
        let a = assignment(true, "pending");
        let perms = resolve_participant_permissions(&i, Some(&a), false).unwrap();
        assert_eq!(perms, ParticipantPermissions::full_access());
    }

    #[test]
    fn test_unassigned_visitor_has_no_access() {
        let i = intervention(true);
        let perms = resolve_participant_permissions(&i, None, false).unwrap();
        assert_eq!(
            perms,
            ParticipantPermissions::no_access(REASON_NOT_ASSIGNED)
        );
    }

    #[test]
    fn test_assignment_without_gate_means_full_access() {
        let i = intervention(true);
        let a = assignment(false, "not_required");
        let perms = resolve_participant_permissions(&i, Some(&a), false).unwrap();
        assert_eq!(perms, ParticipantPermissions::full_access());
    }

    #[test]
    fn test_pending_confirmation_limits_capabilities() {
        let i = intervention(true);
        let a = assignment(true, "pending");
        let perms = resolve_participant_permissions(&i, Some(&a), false).unwrap();
        assert!(perms.can_interact);
        assert!(perms.can_confirm);
        assert!(perms.can_chat);
        assert!(!perms.can_edit_schedule);
        assert!(!perms.can_upload_documents);
        assert!(!perms.can_manage_quotes);
        assert_eq!(perms.reason, Some(REASON_CONFIRMATION_REQUIRED));
    }

    #[test]
    fn test_confirmed_participant_gets_full_access() {
        let i = intervention(true);
        let a = assignment(true, "confirmed");
        let perms = resolve_participant_permissions(&i, Some(&a), false).unwrap();
        assert_eq!(perms, ParticipantPermissions::full_access());
        assert!(!perms.can_confirm);
    }

    #[test]
    fn test_declined_participant_keeps_chat_only() {
        let i = intervention(true);
        let a = assignment(true, "rejected");
        let perms = resolve_participant_permissions(&i, Some(&a), false).unwrap();
        assert!(perms.can_chat);
        assert!(!perms.can_interact);
        assert!(!perms.can_confirm);
        assert!(!perms.can_edit_schedule);
        assert!(!perms.can_upload_documents);
        assert!(!perms.can_manage_quotes);
        assert_eq!(perms.reason, Some(REASON_PARTICIPATION_DECLINED));
    }

    #[test]
    fn test_corrupt_confirmation_status_is_an_error_not_a_grant() {
        let i = intervention(true);
        let a = assignment(true, "whatever");
        let err = resolve_participant_permissions(&i, Some(&a), false).unwrap_err();
        assert_eq!(err.wire_code(), "validation_failed");
    }
}
