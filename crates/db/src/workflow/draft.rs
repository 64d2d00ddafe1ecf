//! Staff edits to the draft.

use std::collections::HashSet;

use frond_core::error::CoreError;
use frond_core::shortlist::validation::{
    validate_draft_batch, validate_known_items, validate_note, validate_staff_quantity,
};
use frond_core::shortlist::{check_draft_editable, check_expected_version};
use frond_core::types::DbId;
use sqlx::PgPool;

use super::{load_history, lock_shortlist, rejected, ShortlistWorkflow, WorkflowResult};
use crate::models::shortlist_item::{DraftItemInput, SaveDraft, SaveDraftOutcome};
use crate::repositories::{PlantRepo, ShortlistItemRepo, ShortlistRepo};

fn validate_item(item: &DraftItemInput) -> Result<(), CoreError> {
    validate_staff_quantity(item.quantity)?;
    if let Some(note) = &item.note {
        validate_note("note", note)?;
    }
    if let Some(why) = &item.why_picked {
        validate_note("why_picked", why)?;
    }
    Ok(())
}

impl ShortlistWorkflow {
    /// Apply a batch of draft edits and advance the version counter by one.
    ///
    /// The batch is rejected as a whole when the draft lineage is still
    /// pinned to a customer-submitted version, when `expected_version_number`
    /// no longer matches, or when it references items or plants that do not
    /// exist. No version is created.
    pub async fn save_draft(
        pool: &PgPool,
        shortlist_id: DbId,
        input: &SaveDraft,
    ) -> WorkflowResult<SaveDraftOutcome> {
        let updated_ids: Vec<DbId> = input.items.iter().filter_map(|i| i.id).collect();
        let new_count = input.items.len() - updated_ids.len();
        validate_draft_batch(&updated_ids, new_count, &input.removed_item_ids)?;
        for item in &input.items {
            validate_item(item)?;
        }

        let mut tx = pool.begin().await?;

        let shortlist = lock_shortlist(&mut tx, shortlist_id).await?;
        let stored = shortlist.stored_status()?;
        let history = load_history(&mut tx, &shortlist).await?;

        check_draft_editable(stored, &history.counters)
            .map_err(|e| rejected("save_draft", shortlist_id, e))?;
        check_expected_version(input.expected_version_number, shortlist.current_version_number)
            .map_err(|e| rejected("save_draft", shortlist_id, e))?;

        let existing = ShortlistItemRepo::list_ids(&mut tx, shortlist_id).await?;
        let referenced: Vec<DbId> = updated_ids
            .iter()
            .chain(input.removed_item_ids.iter())
            .copied()
            .collect();
        validate_known_items(&referenced, &existing, "Item")?;

        let mut plant_ids: Vec<DbId> = input.items.iter().map(|i| i.plant_id).collect();
        plant_ids.sort_unstable();
        plant_ids.dedup();
        let known_plants: HashSet<DbId> = PlantRepo::existing_ids(&mut tx, &plant_ids)
            .await?
            .into_iter()
            .collect();
        if let Some(missing) = plant_ids.iter().find(|id| !known_plants.contains(*id)) {
            return Err(CoreError::Validation(format!("Plant {missing} does not exist")).into());
        }

        ShortlistItemRepo::delete_many(&mut tx, shortlist_id, &input.removed_item_ids).await?;
        for item in &input.items {
            match item.id {
                Some(id) => {
                    ShortlistItemRepo::overwrite(&mut tx, shortlist_id, id, item)
                        .await?
                        .ok_or(CoreError::NotFound {
                            entity: "Shortlist item",
                            id,
                        })?;
                }
                None => {
                    ShortlistItemRepo::insert(&mut tx, shortlist_id, item).await?;
                }
            }
        }

        let current_version_number =
            ShortlistRepo::increment_version_counter(&mut tx, shortlist_id).await?;
        let items = ShortlistItemRepo::list_by_shortlist(&mut tx, shortlist_id).await?;

        tx.commit().await?;

        tracing::info!(
            shortlist_id,
            version_number = current_version_number,
            status = %stored,
            updated = updated_ids.len(),
            added = new_count,
            removed = input.removed_item_ids.len(),
            "Shortlist draft saved"
        );

        Ok(SaveDraftOutcome {
            shortlist_id,
            current_version_number,
            items,
        })
    }
}
