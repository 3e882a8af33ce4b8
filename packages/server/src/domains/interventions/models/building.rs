use anyhow::Result;
use sqlx::PgExecutor;

use crate::common::{BuildingId, UserId};

/// Building → manager mapping.
///
/// Building/lot CRUD lives elsewhere; this table only answers "who manages
/// this building" for notification routing.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct BuildingManager {
    pub building_id: BuildingId,
    pub user_id: UserId,
}

impl BuildingManager {
    pub async fn insert(&self, executor: impl PgExecutor<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO building_managers (building_id, user_id)
             VALUES ($1, $2)
             RETURNING *",
        )
        .bind(self.building_id)
        .bind(self.user_id)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// User ids of a building's managers
    pub async fn manager_ids(
        building_id: BuildingId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM building_managers WHERE building_id = $1",
        )
        .bind(building_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }
}
