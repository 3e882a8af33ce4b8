use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{BuildingId, InterventionId, LotId, TeamId, UserId};

/// Intervention model - SQL persistence layer
///
/// `status` is stored as TEXT; external clients depend on the exact strings,
/// so the column is the wire vocabulary and `status()` parses it into the
/// closed enum. Interventions are never deleted - cancellation is a status.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    pub id: InterventionId,
    pub team_id: TeamId,
    pub building_id: BuildingId,
    pub lot_id: Option<LotId>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub requires_participant_confirmation: bool,
    /// Set only on children produced by splitting; immutable once set.
    pub parent_intervention_id: Option<InterventionId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status enum - the nodes of the lifecycle graph (see `machines`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    Pending,
    Rejected,
    Approved,
    QuoteRequested,
    Scheduling,
    Scheduled,
    InProgress,
    ProviderCompleted,
    TenantValidated,
    Completed,
    Cancelled,
}

impl InterventionStatus {
    /// The wire/database spelling of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionStatus::Pending => "pending",
            InterventionStatus::Rejected => "rejected",
            InterventionStatus::Approved => "approved",
            InterventionStatus::QuoteRequested => "quote_requested",
            InterventionStatus::Scheduling => "scheduling",
            InterventionStatus::Scheduled => "scheduled",
            InterventionStatus::InProgress => "in_progress",
            InterventionStatus::ProviderCompleted => "provider_completed",
            InterventionStatus::TenantValidated => "tenant_validated",
            InterventionStatus::Completed => "completed",
            InterventionStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for InterventionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InterventionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(InterventionStatus::Pending),
            "rejected" => Ok(InterventionStatus::Rejected),
            "approved" => Ok(InterventionStatus::Approved),
            "quote_requested" => Ok(InterventionStatus::QuoteRequested),
            "scheduling" => Ok(InterventionStatus::Scheduling),
            "scheduled" => Ok(InterventionStatus::Scheduled),
            "in_progress" => Ok(InterventionStatus::InProgress),
            "provider_completed" => Ok(InterventionStatus::ProviderCompleted),
            "tenant_validated" => Ok(InterventionStatus::TenantValidated),
            "completed" => Ok(InterventionStatus::Completed),
            "cancelled" => Ok(InterventionStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid intervention status: {}", s)),
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Intervention {
    /// Parse the stored status into the closed enum.
    pub fn status(&self) -> Result<InterventionStatus> {
        self.status.parse()
    }

    /// Find intervention by ID
    pub async fn find_by_id(
        id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM interventions WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// Insert new intervention
    pub async fn insert(&self, executor: impl PgExecutor<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO interventions (
                id, team_id, building_id, lot_id, title, description, status,
                scheduled_date, requires_participant_confirmation,
                parent_intervention_id, created_by
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(self.id)
        .bind(self.team_id)
        .bind(self.building_id)
        .bind(self.lot_id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(&self.status)
        .bind(self.scheduled_date)
        .bind(self.requires_participant_confirmation)
        .bind(self.parent_intervention_id)
        .bind(self.created_by)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Conditionally transition the status.
    ///
    /// The WHERE clause carries the expected prior statuses so concurrent
    /// writers cannot both succeed against stale state. Returns `None` when
    /// the row exists but is no longer in an expected status (or is gone).
    pub async fn update_status(
        id: InterventionId,
        to: InterventionStatus,
        expected: &[InterventionStatus],
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        let expected: Vec<&str> = expected.iter().map(|s| s.as_str()).collect();
        sqlx::query_as::<_, Self>(
            "UPDATE interventions
             SET status = $2, updated_at = now()
             WHERE id = $1 AND status = ANY($3)
             RETURNING *",
        )
        .bind(id)
        .bind(to.as_str())
        .bind(expected)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Set the scheduled date (scheduling phase input).
    pub async fn set_scheduled_date(
        id: InterventionId,
        scheduled_date: DateTime<Utc>,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE interventions
             SET scheduled_date = $2, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(scheduled_date)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Children produced by splitting this intervention
    pub async fn find_children(
        parent_id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM interventions
             WHERE parent_intervention_id = $1
             ORDER BY created_at",
        )
        .bind(parent_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }
}
