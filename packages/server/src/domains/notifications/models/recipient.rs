use anyhow::Result;
use sqlx::PgExecutor;

use crate::common::UserId;

/// Notification routing info for a user.
///
/// User management is a separate concern; the dispatcher only needs to know
/// where a participant can be reached.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Recipient {
    pub id: UserId,
    pub display_name: String,
    pub email: Option<String>,
    pub expo_push_token: Option<String>,
}

impl Recipient {
    /// Routing info for a set of users (missing ids are skipped)
    pub async fn load_many(
        user_ids: &[UserId],
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Self>(
            "SELECT id, display_name, email, expo_push_token
             FROM users
             WHERE id = ANY($1)",
        )
        .bind(user_ids.to_vec())
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// Insert a user row (used by fixtures and provisioning)
    pub async fn insert(&self, executor: impl PgExecutor<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (id, display_name, email, expo_push_token)
             VALUES ($1, $2, $3, $4)
             RETURNING id, display_name, email, expo_push_token",
        )
        .bind(self.id)
        .bind(&self.display_name)
        .bind(&self.email)
        .bind(&self.expo_push_token)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }
}
