//! Draft item model and the staff save payload.

use frond_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `shortlist_items` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ShortlistItem {
    pub id: DbId,
    pub shortlist_id: DbId,
    pub plant_id: DbId,
    pub quantity: i32,
    pub note: Option<String>,
    pub why_picked: Option<String>,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn default_quantity() -> i32 {
    1
}

/// One line in a draft save. With `id` it overwrites that draft item,
/// without it a new item is added.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftItemInput {
    pub id: Option<DbId>,
    pub plant_id: DbId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub note: Option<String>,
    pub why_picked: Option<String>,
    #[serde(default)]
    pub position: i32,
}

/// A batch of staff edits to the draft, applied atomically.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveDraft {
    /// When set, the save is rejected with a conflict unless the shortlist
    /// counter still has this value.
    pub expected_version_number: Option<VersionNumber>,
    #[serde(default)]
    pub items: Vec<DraftItemInput>,
    #[serde(default)]
    pub removed_item_ids: Vec<DbId>,
}

/// Result of an accepted draft save.
#[derive(Debug, Clone, Serialize)]
pub struct SaveDraftOutcome {
    pub shortlist_id: DbId,
    pub current_version_number: VersionNumber,
    pub items: Vec<ShortlistItem>,
}
