//! # Database — PostgreSQL Archive Store
//!
//! Async storage for archived calculations via `sqlx::PgPool`.
//!
//! ## Schema
//!
//! - `calculations`: market discriminator, flattened request columns for
//!   filtering, the full request+breakdown as jsonb, creation timestamp.
//!
//! ## Module Structure
//!
//! - [`calculations`] — archive insert, recency-ordered listing, set delete
//!
//! The engines never touch this layer; they only produce the breakdown that
//! gets persisted, so previews need no database at all.

mod calculations;

use anyhow::Result;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

/// An archived calculation row. `payload` holds the request and breakdown
/// exactly as previewed; the typed columns mirror a subset for queries.
#[derive(sqlx::FromRow)]
pub struct CalculationRow {
    pub id: uuid::Uuid,
    pub market: String,
    pub user_name: String,
    pub project_name: String,
    pub fence_type: String,
    pub meters: f64,
    pub payload: Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL using the provided database URL.
    ///
    /// Manually parses the URL to preserve the full username — sqlx's built-in
    /// parser strips the ".project-ref" suffix that pooler setups require.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let url = url::Url::parse(database_url)?;
        let username = urlencoding::decode(url.username())?.into_owned();
        let password = url
            .password()
            .map(|p| urlencoding::decode(p).map(|s| s.into_owned()))
            .transpose()?;
        let mut opts = PgConnectOptions::new()
            .host(url.host_str().unwrap_or("localhost"))
            .port(url.port().unwrap_or(5432))
            .database(url.path().trim_start_matches('/'))
            .username(&username)
            .statement_cache_capacity(0);
        if let Some(ref pw) = password {
            opts = opts.password(pw);
        }
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(opts)
            .await?;
        Ok(Database { pool })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the bootstrap schema. Idempotent; run at server startup and by
    /// the integration-test harness.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(include_str!("../../migrations/001_create_calculations.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Health check: execute `SELECT 1` to verify database connectivity.
    ///
    /// Used by the `/readyz` readiness probe. Returns `Ok(())` if the
    /// database responds, or an error if the connection is broken.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
