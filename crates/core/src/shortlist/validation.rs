//! Field and payload validation for shortlist writes.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length for a shortlist title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum allowed length for a shortlist description.
pub const MAX_DESCRIPTION_LENGTH: usize = 4000;

/// Maximum allowed length for an item note or "why picked" annotation.
pub const MAX_NOTE_LENGTH: usize = 2000;

/// Upper bound on a single line's quantity.
pub const MAX_QUANTITY: i32 = 10_000;

/// Maximum number of item changes accepted in one save or finalize request.
pub const MAX_ITEMS_PER_BATCH: usize = 500;

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate a shortlist title: non-empty, trimmed, within [`MAX_TITLE_LENGTH`].
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Shortlist title must not be empty".to_string(),
        ));
    }
    if trimmed.len() != title.len() {
        return Err(CoreError::Validation(
            "Shortlist title must not have leading or trailing whitespace".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Shortlist title must not exceed {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Shortlist description must not exceed {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a free-text item field (`note`, `why_picked`).
pub fn validate_note(field: &str, value: &str) -> Result<(), CoreError> {
    if value.chars().count() > MAX_NOTE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Item {field} must not exceed {MAX_NOTE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Staff quantities: at least one of each picked plant.
pub fn validate_staff_quantity(quantity: i32) -> Result<(), CoreError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(CoreError::Validation(format!(
            "Quantity must be between 1 and {MAX_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

/// Customer quantities: zero declines the plant.
pub fn validate_customer_quantity(quantity: i32) -> Result<(), CoreError> {
    if !(0..=MAX_QUANTITY).contains(&quantity) {
        return Err(CoreError::Validation(format!(
            "Quantity must be between 0 and {MAX_QUANTITY}, got {quantity}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Batch validation
// ---------------------------------------------------------------------------

fn first_duplicate(ids: &[DbId]) -> Option<DbId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().find(|id| !seen.insert(*id))
}

/// Validate the shape of a staff draft save.
///
/// `updated_ids` are the ids of existing items being changed, `new_count`
/// the number of items being added and `removed_ids` the items being
/// deleted. An empty batch is rejected: it would advance the counter
/// without any change.
pub fn validate_draft_batch(
    updated_ids: &[DbId],
    new_count: usize,
    removed_ids: &[DbId],
) -> Result<(), CoreError> {
    let total = updated_ids.len() + new_count + removed_ids.len();
    if total == 0 {
        return Err(CoreError::Validation(
            "Draft save contains no changes".to_string(),
        ));
    }
    if total > MAX_ITEMS_PER_BATCH {
        return Err(CoreError::Validation(format!(
            "Draft save exceeds {MAX_ITEMS_PER_BATCH} item changes"
        )));
    }
    if let Some(id) = first_duplicate(updated_ids) {
        return Err(CoreError::Validation(format!(
            "Item {id} appears more than once in the save"
        )));
    }
    if let Some(id) = first_duplicate(removed_ids) {
        return Err(CoreError::Validation(format!(
            "Item {id} is removed more than once"
        )));
    }
    let removed: HashSet<DbId> = removed_ids.iter().copied().collect();
    if let Some(id) = updated_ids.iter().find(|id| removed.contains(*id)) {
        return Err(CoreError::Validation(format!(
            "Item {id} cannot be both updated and removed"
        )));
    }
    Ok(())
}

/// Check that every referenced id belongs to the target item set.
pub fn validate_known_items(
    referenced: &[DbId],
    known: &[DbId],
    entity: &str,
) -> Result<(), CoreError> {
    let known: HashSet<DbId> = known.iter().copied().collect();
    if let Some(id) = referenced.iter().find(|id| !known.contains(*id)) {
        return Err(CoreError::Validation(format!(
            "{entity} {id} does not belong to this shortlist"
        )));
    }
    Ok(())
}

/// Validate the shape of a customer finalize request.
pub fn validate_finalize_batch(edited_ids: &[DbId]) -> Result<(), CoreError> {
    if edited_ids.is_empty() {
        return Err(CoreError::Validation(
            "Submission must include at least one item".to_string(),
        ));
    }
    if edited_ids.len() > MAX_ITEMS_PER_BATCH {
        return Err(CoreError::Validation(format!(
            "Submission exceeds {MAX_ITEMS_PER_BATCH} items"
        )));
    }
    if let Some(id) = first_duplicate(edited_ids) {
        return Err(CoreError::Validation(format!(
            "Item {id} appears more than once in the submission"
        )));
    }
    Ok(())
}
