//! Repository for the `plants` table (catalog directory lookups).

use frond_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::plant::{CreatePlant, Plant};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, scientific_name, price_band, created_at, updated_at";

/// Provides the catalog lookups used to decorate shortlist items.
pub struct PlantRepo;

impl PlantRepo {
    /// Insert a new plant, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePlant) -> Result<Plant, sqlx::Error> {
        let query = format!(
            "INSERT INTO plants (name, scientific_name, price_band) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Plant>(&query)
            .bind(&input.name)
            .bind(&input.scientific_name)
            .bind(&input.price_band)
            .fetch_one(pool)
            .await
    }

    /// Fetch every plant whose id is in `ids`. Unknown ids are skipped.
    pub async fn find_by_ids(
        conn: &mut PgConnection,
        ids: &[DbId],
    ) -> Result<Vec<Plant>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM plants WHERE id = ANY($1)");
        sqlx::query_as::<_, Plant>(&query)
            .bind(ids)
            .fetch_all(conn)
            .await
    }

    /// Return the subset of `ids` that exist in the catalog.
    pub async fn existing_ids(
        conn: &mut PgConnection,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<(DbId,)> = sqlx::query_as("SELECT id FROM plants WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(conn)
            .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
