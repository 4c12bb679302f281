//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Once;

/// Returns the test database URL from the `TEST_DATABASE_URL` environment variable.
/// Panics if the variable is not set.
pub fn test_db_url() -> String {
    std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set for integration tests")
}

/// Returns true if the test database URL is configured.
pub fn has_test_db() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// One-time schema initialization.
static SCHEMA_INIT: Once = Once::new();

/// Ensure the test database schema is set up (runs migrations once per test suite).
pub fn ensure_schema() {
    SCHEMA_INIT.call_once(|| {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let db = railquote::db::Database::connect(&test_db_url())
                .await
                .expect("Failed to connect to test database");
            db.ensure_schema().await.expect("Failed to run migrations");
        });
    });
}

/// Connect to the test database (also ensures schema is set up).
pub async fn setup_test_db() -> railquote::db::Database {
    ensure_schema();
    let db = railquote::db::Database::connect(&test_db_url())
        .await
        .expect("Failed to connect to test database");
    truncate_all_tables(db.pool()).await;
    db
}

/// Build an Axum test app router connected to the test database.
pub async fn build_test_app() -> axum::Router {
    let db = setup_test_db().await;
    let state = railquote::server::AppState::with_db(db, railquote::rates::RateBook::default());
    railquote::server::build_router(state, None)
}

/// Truncate all tables to ensure test isolation.
pub async fn truncate_all_tables(pool: &sqlx::PgPool) {
    sqlx::raw_sql("TRUNCATE TABLE calculations CASCADE")
        .execute(pool)
        .await
        .unwrap();
}
