//! Creating, renaming, procuring and deleting shortlists.

use frond_core::error::CoreError;
use frond_core::shortlist::validation::{validate_description, validate_title};
use frond_core::shortlist::{check_deletable, check_mark_procured};
use frond_core::status::ShortlistStatus;
use frond_core::types::DbId;
use sqlx::PgPool;

use super::{lock_shortlist, rejected, shortlist_not_found, ShortlistWorkflow, WorkflowResult};
use crate::models::shortlist::{CreateShortlist, Shortlist, UpdateShortlist};
use crate::repositories::{CustomerRepo, ShortlistRepo, ShortlistVersionRepo};

impl ShortlistWorkflow {
    /// Create an empty `DRAFT` shortlist for a customer.
    pub async fn create(
        pool: &PgPool,
        customer_id: DbId,
        input: &CreateShortlist,
    ) -> WorkflowResult<Shortlist> {
        validate_title(&input.title)?;
        if let Some(description) = &input.description {
            validate_description(description)?;
        }

        CustomerRepo::find_by_id(pool, customer_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Customer",
                id: customer_id,
            })?;

        let shortlist = ShortlistRepo::create(pool, customer_id, input).await?;
        tracing::info!(
            shortlist_id = shortlist.id,
            customer_id,
            "Shortlist created"
        );
        Ok(shortlist)
    }

    /// Change title or description. The draft lineage is unaffected.
    pub async fn update_details(
        pool: &PgPool,
        shortlist_id: DbId,
        input: &UpdateShortlist,
    ) -> WorkflowResult<Shortlist> {
        if let Some(title) = &input.title {
            validate_title(title)?;
        }
        if let Some(Some(description)) = &input.description {
            validate_description(description)?;
        }

        let shortlist = ShortlistRepo::update_details(pool, shortlist_id, input)
            .await?
            .ok_or_else(|| shortlist_not_found(shortlist_id))?;
        tracing::info!(shortlist_id, "Shortlist details updated");
        Ok(shortlist)
    }

    /// Mark a shortlist `TO_BE_PROCURED`. The state is terminal.
    pub async fn mark_procured(pool: &PgPool, shortlist_id: DbId) -> WorkflowResult<Shortlist> {
        let mut tx = pool.begin().await?;

        let shortlist = lock_shortlist(&mut tx, shortlist_id).await?;
        let stored = shortlist.stored_status()?;
        check_mark_procured(stored).map_err(|e| rejected("mark_procured", shortlist_id, e))?;

        let updated =
            ShortlistRepo::set_status(&mut tx, shortlist_id, ShortlistStatus::ToBeProcured).await?;
        tx.commit().await?;

        tracing::info!(
            shortlist_id,
            status = %ShortlistStatus::ToBeProcured,
            previous_status = %stored,
            "Shortlist marked for procurement"
        );
        Ok(updated)
    }

    /// Delete a shortlist that has never been sent.
    pub async fn delete(pool: &PgPool, shortlist_id: DbId) -> WorkflowResult<()> {
        let mut tx = pool.begin().await?;

        lock_shortlist(&mut tx, shortlist_id).await?;
        let version_count = ShortlistVersionRepo::count_by_shortlist(&mut tx, shortlist_id).await?;
        check_deletable(version_count).map_err(|e| rejected("delete", shortlist_id, e))?;

        ShortlistRepo::delete(&mut tx, shortlist_id).await?;
        tx.commit().await?;

        tracing::info!(shortlist_id, "Shortlist deleted");
        Ok(())
    }
}
