//! Repository for the `shortlists` table.
//!
//! The version counter is only ever changed with single-statement atomic
//! updates (`current_version_number + 1`, `GREATEST(...)`), never by writing
//! back a value read earlier.

use frond_core::status::ShortlistStatus;
use frond_core::types::{DbId, VersionNumber};
use sqlx::{PgConnection, PgPool};

use crate::models::shortlist::{CreateShortlist, Shortlist, UpdateShortlist};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, title, description, status_id, \
    current_version_number, created_at, updated_at";

/// Provides CRUD, locking and counter operations for shortlists.
pub struct ShortlistRepo;

impl ShortlistRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new shortlist in `DRAFT` with a zero counter.
    pub async fn create(
        pool: &PgPool,
        customer_id: DbId,
        input: &CreateShortlist,
    ) -> Result<Shortlist, sqlx::Error> {
        let query = format!(
            "INSERT INTO shortlists (customer_id, title, description, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shortlist>(&query)
            .bind(customer_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(ShortlistStatus::Draft.id())
            .fetch_one(pool)
            .await
    }

    /// Find a shortlist by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shortlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shortlists WHERE id = $1");
        sqlx::query_as::<_, Shortlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a customer's shortlists, newest first.
    pub async fn list_by_customer(
        conn: &mut PgConnection,
        customer_id: DbId,
    ) -> Result<Vec<Shortlist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shortlists
             WHERE customer_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Shortlist>(&query)
            .bind(customer_id)
            .fetch_all(conn)
            .await
    }

    /// Update title/description. An absent title or description is kept;
    /// `Some(None)` clears the description. The counter is untouched.
    pub async fn update_details(
        pool: &PgPool,
        id: DbId,
        input: &UpdateShortlist,
    ) -> Result<Option<Shortlist>, sqlx::Error> {
        let description_provided = input.description.is_some();
        let description = input.description.as_ref().and_then(|d| d.as_deref());

        let query = format!(
            "UPDATE shortlists SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shortlist>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(description_provided)
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a shortlist (draft items cascade). Returns `true`
    /// if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shortlists WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Transactional operations ─────────────────────────────────────

    /// Read a shortlist inside the caller's transaction without locking.
    pub async fn fetch(conn: &mut PgConnection, id: DbId) -> Result<Option<Shortlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shortlists WHERE id = $1");
        sqlx::query_as::<_, Shortlist>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Read a shortlist and take its row lock until the transaction ends.
    ///
    /// Every workflow write locks the shortlist first, which serializes
    /// saves, publishes, revisions and finalizations of the same shortlist.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<Shortlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shortlists WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Shortlist>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Atomically increment the version counter, returning the new value.
    pub async fn increment_version_counter(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<VersionNumber, sqlx::Error> {
        let row: (VersionNumber,) = sqlx::query_as(
            "UPDATE shortlists SET current_version_number = current_version_number + 1 \
             WHERE id = $1 RETURNING current_version_number",
        )
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(row.0)
    }

    /// Raise the version counter to at least `floor`, returning the new value.
    pub async fn raise_version_counter(
        conn: &mut PgConnection,
        id: DbId,
        floor: VersionNumber,
    ) -> Result<VersionNumber, sqlx::Error> {
        let row: (VersionNumber,) = sqlx::query_as(
            "UPDATE shortlists SET current_version_number = GREATEST(current_version_number, $2) \
             WHERE id = $1 RETURNING current_version_number",
        )
        .bind(id)
        .bind(floor)
        .fetch_one(conn)
        .await?;
        Ok(row.0)
    }

    /// Set the stored status.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: ShortlistStatus,
    ) -> Result<Shortlist, sqlx::Error> {
        let query = format!("UPDATE shortlists SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Shortlist>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_one(conn)
            .await
    }
}
