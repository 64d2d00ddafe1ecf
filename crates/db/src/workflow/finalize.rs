//! Customer-facing access through a share token.

use frond_core::error::CoreError;
use frond_core::share_token::is_well_formed;
use frond_core::shortlist::validation::{
    validate_customer_quantity, validate_finalize_batch, validate_known_items, validate_note,
};
use frond_core::shortlist::{check_finalizable, finalize_advances_shortlist};
use frond_core::status::ShortlistStatus;
use frond_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use super::{
    decorate_items, load_history, lock_shortlist, rejected, shortlist_not_found,
    ShortlistWorkflow, WorkflowResult,
};
use crate::models::shortlist::ShortlistItemView;
use crate::models::shortlist_version::{
    FinalizeItemEdit, FinalizeOutcome, FinalizeShortlist, PublicVersionView, ShortlistVersion,
};
use crate::repositories::{ShortlistRepo, ShortlistVersionRepo};

fn token_not_found() -> CoreError {
    CoreError::NotFoundByKey {
        entity: "Shortlist version",
        key: "share token".to_string(),
    }
}

/// Resolve a share token to its version. Malformed tokens never reach the
/// database.
async fn resolve_token(conn: &mut PgConnection, token: &str) -> WorkflowResult<ShortlistVersion> {
    if !is_well_formed(token) {
        return Err(token_not_found().into());
    }
    ShortlistVersionRepo::find_by_token(conn, token)
        .await?
        .ok_or_else(|| token_not_found().into())
}

fn validate_edit(edit: &FinalizeItemEdit) -> Result<(), CoreError> {
    validate_customer_quantity(edit.quantity)?;
    if let Some(note) = &edit.note {
        validate_note("note", note)?;
    }
    Ok(())
}

impl ShortlistWorkflow {
    /// The version behind a share token, as the customer sees it.
    pub async fn view_public(pool: &PgPool, token: &str) -> WorkflowResult<PublicVersionView> {
        let mut conn = pool.acquire().await?;

        let version = resolve_token(&mut conn, token).await?;
        let shortlist = ShortlistRepo::fetch(&mut conn, version.shortlist_id)
            .await?
            .ok_or_else(|| shortlist_not_found(version.shortlist_id))?;
        let status = version.status_at_time()?;

        let items: Vec<ShortlistItemView> = ShortlistVersionRepo::list_items(&mut conn, version.id)
            .await?
            .into_iter()
            .map(ShortlistItemView::from)
            .collect();
        let items = decorate_items(&mut conn, items).await?;

        Ok(PublicVersionView {
            shortlist_title: shortlist.title,
            shortlist_description: shortlist.description,
            version_number: version.version_number,
            status,
            can_finalize: status == ShortlistStatus::SentToCustomer,
            items,
            submitted_at: version.submitted_at,
        })
    }

    /// Apply the customer's final quantities and notes to a version and seal
    /// it as `CUSTOMER_SUBMITTED`.
    ///
    /// Only a version still in `SENT_TO_CUSTOMER` can be finalized, so a
    /// second submission on the same token is forbidden. The shortlist's
    /// stored status follows only when this is the newest version and staff
    /// have not moved the shortlist on since sending it.
    pub async fn finalize(
        pool: &PgPool,
        token: &str,
        input: &FinalizeShortlist,
    ) -> WorkflowResult<FinalizeOutcome> {
        let edited_ids: Vec<DbId> = input.items.iter().map(|e| e.item_id).collect();
        validate_finalize_batch(&edited_ids)?;
        for edit in &input.items {
            validate_edit(edit)?;
        }

        let mut tx = pool.begin().await?;

        // Lock order matches staff writes: shortlist first, then the version.
        let found = resolve_token(&mut tx, token).await?;
        let shortlist = lock_shortlist(&mut tx, found.shortlist_id).await?;
        let version = ShortlistVersionRepo::lock(&mut tx, found.id).await?;

        check_finalizable(version.status_at_time()?)
            .map_err(|e| rejected("finalize", shortlist.id, e))?;

        let known: Vec<DbId> = ShortlistVersionRepo::list_items(&mut tx, version.id)
            .await?
            .iter()
            .map(|i| i.id)
            .collect();
        validate_known_items(&edited_ids, &known, "Item")?;

        for edit in &input.items {
            let applied = ShortlistVersionRepo::apply_customer_edit(
                &mut tx,
                version.id,
                edit.item_id,
                edit.quantity,
                edit.note.as_deref(),
            )
            .await?;
            if !applied {
                return Err(CoreError::Validation(format!(
                    "Item {} does not belong to this shortlist",
                    edit.item_id
                ))
                .into());
            }
        }

        let sealed = ShortlistVersionRepo::mark_submitted(&mut tx, version.id)
            .await?
            .ok_or_else(|| {
                rejected(
                    "finalize",
                    shortlist.id,
                    CoreError::Forbidden("This shortlist has already been submitted".to_string()),
                )
            })?;

        let stored = shortlist.stored_status()?;
        let history = load_history(&mut tx, &shortlist).await?;
        let shortlist_advanced = finalize_advances_shortlist(
            stored,
            sealed.version_number,
            history.latest_version_number(),
        );
        if shortlist_advanced {
            ShortlistRepo::set_status(&mut tx, shortlist.id, ShortlistStatus::CustomerSubmitted)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            shortlist_id = shortlist.id,
            version_number = sealed.version_number,
            status = %ShortlistStatus::CustomerSubmitted,
            shortlist_advanced,
            item_count = input.items.len(),
            "Customer finalized shortlist version"
        );

        Ok(FinalizeOutcome {
            version_number: sealed.version_number,
            status: ShortlistStatus::CustomerSubmitted,
            submitted_at: sealed.submitted_at,
            shortlist_advanced,
        })
    }
}
