//! Sending the draft to the customer as a new immutable version.

use frond_core::share_token::generate_share_token;
use frond_core::shortlist::{allocate_version_number, check_publish};
use frond_core::status::ShortlistStatus;
use frond_core::types::DbId;
use sqlx::PgPool;

use super::{load_history, lock_shortlist, rejected, ShortlistWorkflow, WorkflowResult};
use crate::models::shortlist_version::PublishOutcome;
use crate::repositories::{ShortlistItemRepo, ShortlistRepo, ShortlistVersionRepo};

impl ShortlistWorkflow {
    /// Snapshot the draft into a new `SENT_TO_CUSTOMER` version.
    ///
    /// The version header and its item copies are written in the same
    /// transaction as the status change, so readers see either the whole
    /// version or none of it. A rejected publish leaves the counter and the
    /// history untouched.
    pub async fn publish(pool: &PgPool, shortlist_id: DbId) -> WorkflowResult<PublishOutcome> {
        let mut tx = pool.begin().await?;

        let shortlist = lock_shortlist(&mut tx, shortlist_id).await?;
        let stored = shortlist.stored_status()?;
        let history = load_history(&mut tx, &shortlist).await?;
        let draft_item_count = ShortlistItemRepo::count_by_shortlist(&mut tx, shortlist_id).await?;

        check_publish(stored, &history.counters, draft_item_count)
            .map_err(|e| rejected("publish", shortlist_id, e))?;

        let allocation = allocate_version_number(
            shortlist.current_version_number,
            history.latest_version_number(),
        );
        if allocation.advances_counter {
            ShortlistRepo::raise_version_counter(&mut tx, shortlist_id, allocation.version_number)
                .await?;
        }

        let share_token = generate_share_token();
        let version = ShortlistVersionRepo::insert(
            &mut tx,
            shortlist_id,
            allocation.version_number,
            ShortlistStatus::SentToCustomer,
            &share_token,
        )
        .await?;
        let item_count = ShortlistVersionRepo::copy_draft_items(&mut tx, version.id, shortlist_id).await?;
        ShortlistRepo::set_status(&mut tx, shortlist_id, ShortlistStatus::SentToCustomer).await?;

        tx.commit().await?;

        tracing::info!(
            shortlist_id,
            version_number = version.version_number,
            status = %ShortlistStatus::SentToCustomer,
            previous_status = %stored,
            item_count,
            "Shortlist version sent to customer"
        );

        Ok(PublishOutcome {
            shortlist_id,
            version_number: version.version_number,
            share_token: version.share_token,
            status: ShortlistStatus::SentToCustomer,
            item_count,
        })
    }
}
