//! PostgreSQL persistence for the shortlist workflow.
//!
//! - [`models`]: row structs and request DTOs
//! - [`repositories`]: zero-sized repos with async queries over `&PgPool`
//! - [`workflow`]: transactional operations that run the `frond_core`
//!   guards and the repository writes in one unit

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod workflow;

pub type DbPool = sqlx::PgPool;

/// Default upper bound on pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run a trivial round-trip query to verify connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
