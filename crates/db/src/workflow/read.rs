//! Staff read paths.
//!
//! Reads run in a `REPEATABLE READ` transaction so the shortlist row, its
//! version history and the selected item set come from one snapshot.

use frond_core::error::CoreError;
use frond_core::shortlist::{derive_status, has_unsent_changes, select_item_source, ItemSource};
use frond_core::types::{DbId, VersionNumber};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use super::{
    decorate_items, load_history, shortlist_not_found, ShortlistWorkflow, WorkflowResult,
};
use crate::models::shortlist::{ShortlistItemView, ShortlistSummary, ShortlistView};
use crate::models::shortlist_version::{ShortlistVersion, VersionDetail, VersionSummary};
use crate::repositories::{
    CustomerRepo, ShortlistItemRepo, ShortlistRepo, ShortlistVersionRepo,
};

async fn begin_snapshot(pool: &PgPool) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

fn version_not_found(shortlist_id: DbId, version_number: VersionNumber) -> CoreError {
    CoreError::NotFoundByKey {
        entity: "Shortlist version",
        key: format!("number {version_number} of shortlist {shortlist_id}"),
    }
}

async fn version_items(
    conn: &mut PgConnection,
    version: &ShortlistVersion,
) -> WorkflowResult<Vec<ShortlistItemView>> {
    let items = ShortlistVersionRepo::list_items(conn, version.id)
        .await?
        .into_iter()
        .map(ShortlistItemView::from)
        .collect();
    decorate_items(conn, items).await
}

impl ShortlistWorkflow {
    /// The staff view of a shortlist: displayed status, the item set chosen
    /// from the draft or a version, and the version counters.
    pub async fn read(pool: &PgPool, shortlist_id: DbId) -> WorkflowResult<ShortlistView> {
        let mut tx = begin_snapshot(pool).await?;

        let shortlist = ShortlistRepo::fetch(&mut tx, shortlist_id)
            .await?
            .ok_or_else(|| shortlist_not_found(shortlist_id))?;
        let stored = shortlist.stored_status()?;
        let history = load_history(&mut tx, &shortlist).await?;
        let counters = history.counters;

        let status = derive_status(stored, &history.records);
        let item_source = select_item_source(&counters);

        let items = match item_source {
            ItemSource::Draft => {
                let items = ShortlistItemRepo::list_by_shortlist(&mut tx, shortlist_id)
                    .await?
                    .into_iter()
                    .map(ShortlistItemView::from)
                    .collect();
                decorate_items(&mut tx, items).await?
            }
            ItemSource::Version(number) => {
                let version = ShortlistVersionRepo::find_by_number(&mut tx, shortlist_id, number)
                    .await?
                    .ok_or_else(|| version_not_found(shortlist_id, number))?;
                version_items(&mut tx, &version).await?
            }
        };

        let latest_facing = counters.latest_customer_facing();
        let share_token = if latest_facing > 0 {
            ShortlistVersionRepo::find_by_number(&mut tx, shortlist_id, latest_facing)
                .await?
                .map(|v| v.share_token)
        } else {
            None
        };

        tx.commit().await?;

        Ok(ShortlistView {
            id: shortlist.id,
            customer_id: shortlist.customer_id,
            title: shortlist.title,
            description: shortlist.description,
            status,
            stored_status: stored,
            items,
            item_source,
            read_only: item_source.is_read_only(),
            has_unsent_changes: has_unsent_changes(status, &counters),
            current_version_number: counters.current,
            latest_sent_version_number: counters.sent_max,
            latest_submitted_version_number: counters.submitted_max,
            selected_version_number: item_source.version_number(),
            share_token,
            created_at: shortlist.created_at,
            updated_at: shortlist.updated_at,
        })
    }

    /// A customer's shortlists, newest first, each with its displayed status.
    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> WorkflowResult<Vec<ShortlistSummary>> {
        CustomerRepo::find_by_id(pool, customer_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Customer",
                id: customer_id,
            })?;

        let mut tx = begin_snapshot(pool).await?;
        let shortlists = ShortlistRepo::list_by_customer(&mut tx, customer_id).await?;

        let mut summaries = Vec::with_capacity(shortlists.len());
        for shortlist in shortlists {
            let history = load_history(&mut tx, &shortlist).await?;
            summaries.push(ShortlistSummary {
                status: derive_status(shortlist.stored_status()?, &history.records),
                id: shortlist.id,
                customer_id: shortlist.customer_id,
                title: shortlist.title,
                current_version_number: shortlist.current_version_number,
                created_at: shortlist.created_at,
                updated_at: shortlist.updated_at,
            });
        }
        tx.commit().await?;
        Ok(summaries)
    }

    /// Version history of a shortlist, newest first.
    pub async fn list_versions(
        pool: &PgPool,
        shortlist_id: DbId,
    ) -> WorkflowResult<Vec<VersionSummary>> {
        ShortlistRepo::find_by_id(pool, shortlist_id)
            .await?
            .ok_or_else(|| shortlist_not_found(shortlist_id))?;

        let rows = ShortlistVersionRepo::list_by_shortlist(pool, shortlist_id).await?;
        Ok(rows
            .into_iter()
            .map(VersionSummary::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// One version of a shortlist with its items.
    pub async fn get_version(
        pool: &PgPool,
        shortlist_id: DbId,
        version_number: VersionNumber,
    ) -> WorkflowResult<VersionDetail> {
        let mut conn = pool.acquire().await?;

        ShortlistRepo::fetch(&mut conn, shortlist_id)
            .await?
            .ok_or_else(|| shortlist_not_found(shortlist_id))?;
        let version = ShortlistVersionRepo::find_by_number(&mut conn, shortlist_id, version_number)
            .await?
            .ok_or_else(|| version_not_found(shortlist_id, version_number))?;
        let items = version_items(&mut conn, &version).await?;

        Ok(VersionDetail {
            status_at_time: version.status_at_time()?,
            id: version.id,
            shortlist_id: version.shortlist_id,
            version_number: version.version_number,
            share_token: version.share_token,
            items,
            created_at: version.created_at,
            submitted_at: version.submitted_at,
        })
    }
}
