use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{AssignmentId, InterventionId, UserId};

/// Assignment model - the link between a user and an intervention.
///
/// Carries the participant role plus the confirmation gate the permission
/// resolver reads. `role` and `confirmation_status` are TEXT columns parsed
/// into closed enums at this boundary.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub intervention_id: InterventionId,
    pub user_id: UserId,
    pub role: String,
    pub is_primary: bool,
    pub requires_confirmation: bool,
    pub confirmation_status: String,
    pub created_at: DateTime<Utc>,
}

/// Participant roles - the single dispatch point for role-based branching.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Manager,
    Provider,
    Tenant,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Manager => "manager",
            ParticipantRole::Provider => "provider",
            ParticipantRole::Tenant => "tenant",
        }
    }
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParticipantRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "manager" => Ok(ParticipantRole::Manager),
            "provider" => Ok(ParticipantRole::Provider),
            "tenant" => Ok(ParticipantRole::Tenant),
            _ => Err(anyhow::anyhow!("Invalid participant role: {}", s)),
        }
    }
}

/// Confirmation gate states.
///
/// Only pending assignments ever move, and only to confirmed or rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    NotRequired,
    Pending,
    Confirmed,
    Rejected,
}

impl ConfirmationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationStatus::NotRequired => "not_required",
            ConfirmationStatus::Pending => "pending",
            ConfirmationStatus::Confirmed => "confirmed",
            ConfirmationStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfirmationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "not_required" => Ok(ConfirmationStatus::NotRequired),
            "pending" => Ok(ConfirmationStatus::Pending),
            "confirmed" => Ok(ConfirmationStatus::Confirmed),
            "rejected" => Ok(ConfirmationStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid confirmation status: {}", s)),
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Assignment {
    pub fn role(&self) -> Result<ParticipantRole> {
        self.role.parse()
    }

    pub fn confirmation_status(&self) -> Result<ConfirmationStatus> {
        self.confirmation_status.parse()
    }

    /// Insert new assignment
    pub async fn insert(&self, executor: impl PgExecutor<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO assignments (
                id, intervention_id, user_id, role, is_primary,
                requires_confirmation, confirmation_status
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(self.id)
        .bind(self.intervention_id)
        .bind(self.user_id)
        .bind(&self.role)
        .bind(self.is_primary)
        .bind(self.requires_confirmation)
        .bind(&self.confirmation_status)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// All assignments of an intervention
    pub async fn find_for_intervention(
        intervention_id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM assignments WHERE intervention_id = $1 ORDER BY created_at",
        )
        .bind(intervention_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// A user's assignment on an intervention (primary role first)
    pub async fn find_for_user(
        intervention_id: InterventionId,
        user_id: UserId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM assignments
             WHERE intervention_id = $1 AND user_id = $2
             ORDER BY is_primary DESC
             LIMIT 1",
        )
        .bind(intervention_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// The primary provider assignment, if any
    pub async fn find_primary_provider(
        intervention_id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM assignments
             WHERE intervention_id = $1 AND role = 'provider' AND is_primary = true
             LIMIT 1",
        )
        .bind(intervention_id)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// The primary manager assignment, if any
    pub async fn find_primary_manager(
        intervention_id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM assignments
             WHERE intervention_id = $1 AND role = 'manager' AND is_primary = true
             LIMIT 1",
        )
        .bind(intervention_id)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Distinct user ids of the managers assigned to an intervention
    pub async fn manager_user_ids(
        intervention_id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT DISTINCT user_id FROM assignments
             WHERE intervention_id = $1 AND role = 'manager'",
        )
        .bind(intervention_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// Distinct user ids of the providers assigned to an intervention
    pub async fn distinct_provider_ids(
        intervention_id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT DISTINCT user_id FROM assignments
             WHERE intervention_id = $1 AND role = 'provider'
             ORDER BY user_id",
        )
        .bind(intervention_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// Distinct user ids of everyone assigned to an intervention
    pub async fn participant_user_ids(
        intervention_id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT DISTINCT user_id FROM assignments WHERE intervention_id = $1",
        )
        .bind(intervention_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// Conditionally resolve a pending confirmation.
    ///
    /// Guarded on `confirmation_status = 'pending'`: a declined participant
    /// cannot re-confirm and a confirmed one cannot flip back.
    pub async fn resolve_confirmation(
        id: AssignmentId,
        to: ConfirmationStatus,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE assignments
             SET confirmation_status = $2
             WHERE id = $1 AND confirmation_status = 'pending'
             RETURNING *",
        )
        .bind(id)
        .bind(to.as_str())
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }
}
