//! Repository for the `shortlist_items` table (the mutable draft).

use frond_core::types::DbId;
use sqlx::PgConnection;

use crate::models::shortlist_item::{DraftItemInput, ShortlistItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, shortlist_id, plant_id, quantity, note, why_picked, \
    position, created_at, updated_at";

/// Provides draft item reads and writes. All methods run inside the
/// caller's transaction.
pub struct ShortlistItemRepo;

impl ShortlistItemRepo {
    /// List a shortlist's draft items in display order.
    pub async fn list_by_shortlist(
        conn: &mut PgConnection,
        shortlist_id: DbId,
    ) -> Result<Vec<ShortlistItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shortlist_items
             WHERE shortlist_id = $1
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, ShortlistItem>(&query)
            .bind(shortlist_id)
            .fetch_all(conn)
            .await
    }

    /// Ids of a shortlist's draft items.
    pub async fn list_ids(
        conn: &mut PgConnection,
        shortlist_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM shortlist_items WHERE shortlist_id = $1")
                .bind(shortlist_id)
                .fetch_all(conn)
                .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Count a shortlist's draft items.
    pub async fn count_by_shortlist(
        conn: &mut PgConnection,
        shortlist_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shortlist_items WHERE shortlist_id = $1")
            .bind(shortlist_id)
            .fetch_one(conn)
            .await?;
        Ok(row.0)
    }

    /// Add a new draft item.
    pub async fn insert(
        conn: &mut PgConnection,
        shortlist_id: DbId,
        input: &DraftItemInput,
    ) -> Result<ShortlistItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO shortlist_items
                (shortlist_id, plant_id, quantity, note, why_picked, position)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShortlistItem>(&query)
            .bind(shortlist_id)
            .bind(input.plant_id)
            .bind(input.quantity)
            .bind(&input.note)
            .bind(&input.why_picked)
            .bind(input.position)
            .fetch_one(conn)
            .await
    }

    /// Overwrite every editable field of an existing draft item.
    ///
    /// Returns `None` if the item does not belong to `shortlist_id`.
    pub async fn overwrite(
        conn: &mut PgConnection,
        shortlist_id: DbId,
        id: DbId,
        input: &DraftItemInput,
    ) -> Result<Option<ShortlistItem>, sqlx::Error> {
        let query = format!(
            "UPDATE shortlist_items SET
                plant_id = $3,
                quantity = $4,
                note = $5,
                why_picked = $6,
                position = $7
             WHERE id = $1 AND shortlist_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShortlistItem>(&query)
            .bind(id)
            .bind(shortlist_id)
            .bind(input.plant_id)
            .bind(input.quantity)
            .bind(&input.note)
            .bind(&input.why_picked)
            .bind(input.position)
            .fetch_optional(conn)
            .await
    }

    /// Delete the listed draft items of a shortlist. Returns the number removed.
    pub async fn delete_many(
        conn: &mut PgConnection,
        shortlist_id: DbId,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM shortlist_items WHERE shortlist_id = $1 AND id = ANY($2)")
            .bind(shortlist_id)
            .bind(ids)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Replace all draft items with a field-for-field copy of a version's
    /// items. Returns the number of items cloned.
    pub async fn replace_with_version_items(
        conn: &mut PgConnection,
        shortlist_id: DbId,
        version_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        sqlx::query("DELETE FROM shortlist_items WHERE shortlist_id = $1")
            .bind(shortlist_id)
            .execute(&mut *conn)
            .await?;

        let result = sqlx::query(
            "INSERT INTO shortlist_items
                (shortlist_id, plant_id, quantity, note, why_picked, position)
             SELECT $1, plant_id, quantity, note, why_picked, position
             FROM shortlist_version_items
             WHERE version_id = $2
             ORDER BY position ASC, id ASC",
        )
        .bind(shortlist_id)
        .bind(version_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
