use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::common::{InterventionId, QuoteId, UserId};

/// Rejection reason stamped on competitors when another quote wins.
pub const SUPERSEDED_REASON: &str = "another quote was selected";

/// Quote model - a provider's priced bid against an intervention.
///
/// `status` is TEXT: rows written by the legacy system still carry old
/// spellings of "pending" (`en_attente`, `waiting`), so every pending check
/// in SQL matches the whole alias set while the rest of the code only ever
/// sees the canonical enum.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub intervention_id: InterventionId,
    pub provider_id: UserId,
    pub amount: Decimal,
    pub description: Option<String>,
    pub status: String,
    pub validated_by: Option<UserId>,
    pub validated_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status enum - canonical vocabulary only; aliases die at the boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Sent,
    Accepted,
    Rejected,
    Cancelled,
}

/// Database spellings that mean "pending" (canonical first).
pub const PENDING_DB_VALUES: &[&str] = &["pending", "en_attente", "waiting"];

impl QuoteStatus {
    /// The canonical wire/database spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Cancelled => "cancelled",
        }
    }

    /// Every stored spelling of this status (legacy aliases included).
    pub fn db_values(&self) -> &'static [&'static str] {
        match self {
            QuoteStatus::Pending => PENDING_DB_VALUES,
            QuoteStatus::Sent => &["sent"],
            QuoteStatus::Accepted => &["accepted"],
            QuoteStatus::Rejected => &["rejected"],
            QuoteStatus::Cancelled => &["cancelled"],
        }
    }

    /// Stored spellings of the statuses a quote can be approved from.
    pub fn approvable_db_values() -> Vec<&'static str> {
        let mut values = QuoteStatus::Pending.db_values().to_vec();
        values.extend_from_slice(QuoteStatus::Sent.db_values());
        values
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuoteStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" | "en_attente" | "waiting" => Ok(QuoteStatus::Pending),
            "sent" => Ok(QuoteStatus::Sent),
            "accepted" => Ok(QuoteStatus::Accepted),
            "rejected" => Ok(QuoteStatus::Rejected),
            "cancelled" => Ok(QuoteStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid quote status: {}", s)),
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Quote {
    /// Parse the stored status into the closed enum.
    pub fn status(&self) -> Result<QuoteStatus> {
        self.status.parse()
    }

    /// Find quote by ID
    pub async fn find_by_id(id: QuoteId, executor: impl PgExecutor<'_>) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM quotes WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// All quotes of an intervention
    pub async fn find_for_intervention(
        intervention_id: InterventionId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM quotes WHERE intervention_id = $1 ORDER BY created_at",
        )
        .bind(intervention_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// One provider's quotes on an intervention
    pub async fn find_for_provider(
        intervention_id: InterventionId,
        provider_id: UserId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM quotes
             WHERE intervention_id = $1 AND provider_id = $2
             ORDER BY created_at",
        )
        .bind(intervention_id)
        .bind(provider_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// Insert new quote (status and validation fields taken verbatim, so
    /// split copies keep legacy spellings intact)
    pub async fn insert(&self, executor: impl PgExecutor<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO quotes (
                id, intervention_id, provider_id, amount, description, status,
                validated_by, validated_at, rejection_reason
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(self.id)
        .bind(self.intervention_id)
        .bind(self.provider_id)
        .bind(self.amount)
        .bind(&self.description)
        .bind(&self.status)
        .bind(self.validated_by)
        .bind(self.validated_at)
        .bind(&self.rejection_reason)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Conditionally accept: only a quote still awaiting validation moves.
    ///
    /// Returns `None` when the guard misses - the caller must treat that as
    /// an invalid state, not retry blindly.
    pub async fn accept(
        id: QuoteId,
        validated_by: UserId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE quotes
             SET status = 'accepted', validated_by = $2, validated_at = now(), updated_at = now()
             WHERE id = $1 AND status = ANY($3)
             RETURNING *",
        )
        .bind(id)
        .bind(validated_by)
        .bind(QuoteStatus::approvable_db_values())
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Conditionally reject a pending quote.
    pub async fn reject(
        id: QuoteId,
        validated_by: UserId,
        reason: &str,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE quotes
             SET status = 'rejected', validated_by = $2, validated_at = now(),
                 rejection_reason = $3, updated_at = now()
             WHERE id = $1 AND status = ANY($4)
             RETURNING *",
        )
        .bind(id)
        .bind(validated_by)
        .bind(reason)
        .bind(QuoteStatus::Pending.db_values().to_vec())
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Conditionally cancel: only the owning provider, only while pending.
    pub async fn cancel_by_provider(
        id: QuoteId,
        provider_id: UserId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE quotes
             SET status = 'cancelled', updated_at = now()
             WHERE id = $1 AND provider_id = $2 AND status = ANY($3)
             RETURNING *",
        )
        .bind(id)
        .bind(provider_id)
        .bind(QuoteStatus::Pending.db_values().to_vec())
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Conditionally mark a pending quote as sent (owning provider only).
    pub async fn mark_sent(
        id: QuoteId,
        provider_id: UserId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE quotes
             SET status = 'sent', updated_at = now()
             WHERE id = $1 AND provider_id = $2 AND status = ANY($3)
             RETURNING *",
        )
        .bind(id)
        .bind(provider_id)
        .bind(QuoteStatus::Pending.db_values().to_vec())
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Reject every still-open competitor of one intervention in a single
    /// batch update, excluding the winning quote. Returns the number of
    /// quotes that moved.
    pub async fn bulk_reject_competitors(
        intervention_id: InterventionId,
        exclude: QuoteId,
        reason: &str,
        executor: impl PgExecutor<'_>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE quotes
             SET status = 'rejected', rejection_reason = $3, updated_at = now()
             WHERE intervention_id = $1 AND id <> $2 AND status = ANY($4)",
        )
        .bind(intervention_id)
        .bind(exclude)
        .bind(reason)
        .bind(QuoteStatus::approvable_db_values())
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
