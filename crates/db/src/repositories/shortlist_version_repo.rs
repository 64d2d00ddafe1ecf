//! Repository for `shortlist_versions` and `shortlist_version_items`.
//!
//! Versions are insert-only. The only mutation offered here is the
//! customer's finalize (`apply_customer_edit` + `mark_submitted`), and the
//! storage triggers reject anything else.

use frond_core::status::ShortlistStatus;
use frond_core::types::{DbId, VersionNumber};
use sqlx::{PgConnection, PgPool};

use crate::models::shortlist_version::{
    ShortlistVersion, ShortlistVersionItem, VersionHistoryRow, VersionSummaryRow,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, shortlist_id, version_number, status_at_time_id, share_token, \
    created_at, submitted_at";

/// Column list for version items.
const ITEM_COLUMNS: &str = "id, version_id, plant_id, quantity, note, why_picked, position";

/// Provides snapshot creation and lookups for shortlist versions.
pub struct ShortlistVersionRepo;

impl ShortlistVersionRepo {
    // ── Snapshot creation ────────────────────────────────────────────

    /// Insert a version header. A duplicate `(shortlist_id, version_number)`
    /// surfaces as a unique violation on
    /// `uq_shortlist_versions_shortlist_version`.
    pub async fn insert(
        conn: &mut PgConnection,
        shortlist_id: DbId,
        version_number: VersionNumber,
        status_at_time: ShortlistStatus,
        share_token: &str,
    ) -> Result<ShortlistVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO shortlist_versions
                (shortlist_id, version_number, status_at_time_id, share_token)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShortlistVersion>(&query)
            .bind(shortlist_id)
            .bind(version_number)
            .bind(status_at_time.id())
            .bind(share_token)
            .fetch_one(conn)
            .await
    }

    /// Copy every draft item of a shortlist into a version, field for field.
    /// Returns the number of items copied.
    pub async fn copy_draft_items(
        conn: &mut PgConnection,
        version_id: DbId,
        shortlist_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO shortlist_version_items
                (version_id, plant_id, quantity, note, why_picked, position)
             SELECT $1, plant_id, quantity, note, why_picked, position
             FROM shortlist_items
             WHERE shortlist_id = $2
             ORDER BY position ASC, id ASC",
        )
        .bind(version_id)
        .bind(shortlist_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Version numbers and statuses of a shortlist, ascending.
    pub async fn history(
        conn: &mut PgConnection,
        shortlist_id: DbId,
    ) -> Result<Vec<VersionHistoryRow>, sqlx::Error> {
        sqlx::query_as::<_, VersionHistoryRow>(
            "SELECT id, version_number, status_at_time_id
             FROM shortlist_versions
             WHERE shortlist_id = $1
             ORDER BY version_number ASC",
        )
        .bind(shortlist_id)
        .fetch_all(conn)
        .await
    }

    /// Count a shortlist's versions.
    pub async fn count_by_shortlist(
        conn: &mut PgConnection,
        shortlist_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM shortlist_versions WHERE shortlist_id = $1")
                .bind(shortlist_id)
                .fetch_one(conn)
                .await?;
        Ok(row.0)
    }

    /// List a shortlist's versions with item counts, newest first.
    pub async fn list_by_shortlist(
        pool: &PgPool,
        shortlist_id: DbId,
    ) -> Result<Vec<VersionSummaryRow>, sqlx::Error> {
        sqlx::query_as::<_, VersionSummaryRow>(
            "SELECT v.id, v.shortlist_id, v.version_number, v.status_at_time_id,
                    v.share_token, v.created_at, v.submitted_at,
                    COUNT(i.id) AS item_count
             FROM shortlist_versions v
             LEFT JOIN shortlist_version_items i ON i.version_id = v.id
             WHERE v.shortlist_id = $1
             GROUP BY v.id
             ORDER BY v.version_number DESC",
        )
        .bind(shortlist_id)
        .fetch_all(pool)
        .await
    }

    /// Find a version by its number within a shortlist.
    pub async fn find_by_number(
        conn: &mut PgConnection,
        shortlist_id: DbId,
        version_number: VersionNumber,
    ) -> Result<Option<ShortlistVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shortlist_versions
             WHERE shortlist_id = $1 AND version_number = $2"
        );
        sqlx::query_as::<_, ShortlistVersion>(&query)
            .bind(shortlist_id)
            .bind(version_number)
            .fetch_optional(conn)
            .await
    }

    /// Find a version by its share token.
    pub async fn find_by_token(
        conn: &mut PgConnection,
        share_token: &str,
    ) -> Result<Option<ShortlistVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shortlist_versions WHERE share_token = $1");
        sqlx::query_as::<_, ShortlistVersion>(&query)
            .bind(share_token)
            .fetch_optional(conn)
            .await
    }

    /// Re-read a version and take its row lock until the transaction ends.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<ShortlistVersion, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shortlist_versions WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ShortlistVersion>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// The items of a version in display order.
    pub async fn list_items(
        conn: &mut PgConnection,
        version_id: DbId,
    ) -> Result<Vec<ShortlistVersionItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM shortlist_version_items
             WHERE version_id = $1
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, ShortlistVersionItem>(&query)
            .bind(version_id)
            .fetch_all(conn)
            .await
    }

    // ── Customer finalize ────────────────────────────────────────────

    /// Set a version item's quantity, and its note when one is given. A
    /// `None` note keeps the note staff wrote. Returns `false` if the item
    /// does not belong to `version_id`.
    pub async fn apply_customer_edit(
        conn: &mut PgConnection,
        version_id: DbId,
        item_id: DbId,
        quantity: i32,
        note: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE shortlist_version_items SET quantity = $3, note = COALESCE($4, note)
             WHERE id = $2 AND version_id = $1",
        )
        .bind(version_id)
        .bind(item_id)
        .bind(quantity)
        .bind(note)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a version from `SENT_TO_CUSTOMER` to `CUSTOMER_SUBMITTED`.
    ///
    /// Returns `None` when the version was not in `SENT_TO_CUSTOMER`.
    pub async fn mark_submitted(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ShortlistVersion>, sqlx::Error> {
        let query = format!(
            "UPDATE shortlist_versions
             SET status_at_time_id = $2, submitted_at = NOW()
             WHERE id = $1 AND status_at_time_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShortlistVersion>(&query)
            .bind(id)
            .bind(ShortlistStatus::CustomerSubmitted.id())
            .bind(ShortlistStatus::SentToCustomer.id())
            .fetch_optional(conn)
            .await
    }
}
