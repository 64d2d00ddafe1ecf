//! Shortlist entity model, DTOs and the staff read view.

use frond_core::error::CoreError;
use frond_core::shortlist::ItemSource;
use frond_core::status::{ShortlistStatus, StatusId};
use frond_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::models::plant::Plant;
use crate::models::shortlist_item::ShortlistItem;
use crate::models::shortlist_version::ShortlistVersionItem;

/// A row from the `shortlists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shortlist {
    pub id: DbId,
    pub customer_id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Stored status. A cache only; see [`frond_core::shortlist::derive_status`].
    pub status_id: StatusId,
    pub current_version_number: VersionNumber,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Shortlist {
    /// Decode the stored status.
    pub fn stored_status(&self) -> Result<ShortlistStatus, CoreError> {
        ShortlistStatus::from_id(self.status_id).ok_or_else(|| {
            CoreError::Internal(format!(
                "Shortlist {} has unknown status_id {}",
                self.id, self.status_id
            ))
        })
    }
}

/// DTO for creating a shortlist. The customer comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShortlist {
    pub title: String,
    pub description: Option<String>,
}

/// DTO for updating shortlist details. All fields optional.
///
/// `description` distinguishes an omitted field (keep) from an explicit
/// `null` (clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShortlist {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

/// Wrap any present value, including `null`, in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A shortlist in a customer listing, with its displayed status.
#[derive(Debug, Clone, Serialize)]
pub struct ShortlistSummary {
    pub id: DbId,
    pub customer_id: DbId,
    pub title: String,
    pub status: ShortlistStatus,
    pub current_version_number: VersionNumber,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One item line as shown to staff or the customer, decorated with
/// catalog details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistItemView {
    /// Draft item id or version item id, depending on the item source.
    pub id: DbId,
    pub plant_id: DbId,
    pub plant_name: Option<String>,
    pub scientific_name: Option<String>,
    pub price_band: Option<String>,
    pub quantity: i32,
    pub note: Option<String>,
    pub why_picked: Option<String>,
    pub position: i32,
}

impl ShortlistItemView {
    /// Fill in catalog details from the plant this line refers to.
    pub fn with_plant(mut self, plant: &Plant) -> Self {
        self.plant_name = Some(plant.name.clone());
        self.scientific_name = plant.scientific_name.clone();
        self.price_band = plant.price_band.clone();
        self
    }
}

impl From<ShortlistItem> for ShortlistItemView {
    fn from(item: ShortlistItem) -> Self {
        Self {
            id: item.id,
            plant_id: item.plant_id,
            plant_name: None,
            scientific_name: None,
            price_band: None,
            quantity: item.quantity,
            note: item.note,
            why_picked: item.why_picked,
            position: item.position,
        }
    }
}

impl From<ShortlistVersionItem> for ShortlistItemView {
    fn from(item: ShortlistVersionItem) -> Self {
        Self {
            id: item.id,
            plant_id: item.plant_id,
            plant_name: None,
            scientific_name: None,
            price_band: None,
            quantity: item.quantity,
            note: item.note,
            why_picked: item.why_picked,
            position: item.position,
        }
    }
}

/// The staff read model for a shortlist.
#[derive(Debug, Clone, Serialize)]
pub struct ShortlistView {
    pub id: DbId,
    pub customer_id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Displayed status, derived from the version history.
    pub status: ShortlistStatus,
    pub stored_status: ShortlistStatus,
    pub items: Vec<ShortlistItemView>,
    pub item_source: ItemSource,
    /// True when `items` come from a version and must not be edited.
    pub read_only: bool,
    pub has_unsent_changes: bool,
    pub current_version_number: VersionNumber,
    /// 0 when nothing has been sent.
    pub latest_sent_version_number: VersionNumber,
    /// 0 when nothing has been submitted.
    pub latest_submitted_version_number: VersionNumber,
    pub selected_version_number: Option<VersionNumber>,
    /// Share token of the latest customer-facing version, if any.
    pub share_token: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
