//! Branching a fresh draft lineage from the latest customer-facing version.

use frond_core::error::CoreError;
use frond_core::shortlist::{check_revise, check_send_back, revise_source};
use frond_core::status::ShortlistStatus;
use frond_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use super::{load_history, lock_shortlist, rejected, History, ShortlistWorkflow, WorkflowResult};
use crate::models::shortlist::Shortlist;
use crate::models::shortlist_version::ReviseOutcome;
use crate::repositories::{ShortlistItemRepo, ShortlistRepo, ShortlistVersionRepo};

/// Replace the draft with a clone of the revise source, bump the counter
/// and move the stored status to `target`. The source version is only read.
async fn branch_draft(
    conn: &mut PgConnection,
    shortlist: &Shortlist,
    history: &History,
    target: ShortlistStatus,
) -> WorkflowResult<ReviseOutcome> {
    let source_number = revise_source(&history.counters).ok_or_else(|| {
        CoreError::PreconditionFailed(
            "Shortlist has no customer-facing version to revise from".to_string(),
        )
    })?;
    let source = ShortlistVersionRepo::find_by_number(conn, shortlist.id, source_number)
        .await?
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "Shortlist {} is missing version {source_number}",
                shortlist.id
            ))
        })?;

    let item_count =
        ShortlistItemRepo::replace_with_version_items(conn, shortlist.id, source.id).await?;
    let new_version_number = ShortlistRepo::increment_version_counter(conn, shortlist.id).await?;
    ShortlistRepo::set_status(conn, shortlist.id, target).await?;

    Ok(ReviseOutcome {
        shortlist_id: shortlist.id,
        new_version_number,
        source_version_number: source_number,
        status: target,
        item_count,
    })
}

impl ShortlistWorkflow {
    /// Reopen a sent or submitted shortlist as an editable `DRAFT`.
    ///
    /// The draft items are replaced with a content-identical clone of the
    /// latest submitted version, or of the latest sent one when nothing has
    /// been submitted, and the counter moves one past the history.
    pub async fn revise(pool: &PgPool, shortlist_id: DbId) -> WorkflowResult<ReviseOutcome> {
        let mut tx = pool.begin().await?;

        let shortlist = lock_shortlist(&mut tx, shortlist_id).await?;
        let stored = shortlist.stored_status()?;
        let history = load_history(&mut tx, &shortlist).await?;

        check_revise(stored, &history.counters).map_err(|e| rejected("revise", shortlist_id, e))?;

        let outcome = branch_draft(&mut tx, &shortlist, &history, ShortlistStatus::Draft).await?;
        tx.commit().await?;

        tracing::info!(
            shortlist_id,
            version_number = outcome.new_version_number,
            source_version_number = outcome.source_version_number,
            status = %outcome.status,
            item_count = outcome.item_count,
            "Shortlist revised"
        );
        Ok(outcome)
    }

    /// Return a customer-submitted shortlist to the customer.
    ///
    /// Branches a new draft lineage from the submitted version exactly like
    /// [`ShortlistWorkflow::revise`], but leaves the shortlist in
    /// `SENT_BACK_TO_CUSTOMER` so the next publish re-sends it.
    pub async fn send_back(pool: &PgPool, shortlist_id: DbId) -> WorkflowResult<ReviseOutcome> {
        let mut tx = pool.begin().await?;

        let shortlist = lock_shortlist(&mut tx, shortlist_id).await?;
        let stored = shortlist.stored_status()?;
        let history = load_history(&mut tx, &shortlist).await?;

        check_send_back(stored).map_err(|e| rejected("send_back", shortlist_id, e))?;

        let outcome = branch_draft(
            &mut tx,
            &shortlist,
            &history,
            ShortlistStatus::SentBackToCustomer,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            shortlist_id,
            version_number = outcome.new_version_number,
            source_version_number = outcome.source_version_number,
            status = %outcome.status,
            "Shortlist sent back to customer"
        );
        Ok(outcome)
    }
}
