//! Archive operations for quoted calculations.
//!
//! Lifecycle: a preview is computed without persistence; `insert_calculation`
//! assigns the id and timestamp and persists the previewed payload; records
//! are immutable after that and leave only through `delete_calculations`.

use super::{CalculationRow, Database};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

impl Database {
    /// Archive a previewed calculation. Assigns a fresh uuid and returns it
    /// with the database-side creation timestamp.
    pub async fn insert_calculation(
        &self,
        market: &str,
        user_name: &str,
        project_name: &str,
        fence_type: &str,
        meters: f64,
        payload: &Value,
    ) -> Result<(Uuid, DateTime<Utc>)> {
        let id = Uuid::new_v4();
        let created_at: DateTime<Utc> = sqlx::query_scalar(
            "INSERT INTO calculations (id, market, user_name, project_name, fence_type, meters, payload)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING created_at",
        )
        .bind(id)
        .bind(market)
        .bind(user_name)
        .bind(project_name)
        .bind(fence_type)
        .bind(meters)
        .bind(payload)
        .fetch_one(&self.pool)
        .await?;
        Ok((id, created_at))
    }

    /// List archived calculations for a market, most recent first.
    pub async fn list_calculations(&self, market: &str, limit: i64) -> Result<Vec<CalculationRow>> {
        let rows = sqlx::query_as::<_, CalculationRow>(
            "SELECT id, market, user_name, project_name, fence_type, meters, payload, created_at
             FROM calculations WHERE market = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(market)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Delete the named calculations for a market. Returns the number of rows
    /// removed — exactly the ids that existed, never more. An empty id set is
    /// a no-op returning 0.
    pub async fn delete_calculations(&self, market: &str, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM calculations WHERE market = $1 AND id = ANY($2)")
            .bind(market)
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
