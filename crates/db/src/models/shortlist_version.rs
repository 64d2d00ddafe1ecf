//! Shortlist version (immutable snapshot) models and workflow DTOs.

use frond_core::error::CoreError;
use frond_core::shortlist::VersionRecord;
use frond_core::status::{ShortlistStatus, StatusId};
use frond_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::shortlist::ShortlistItemView;

fn decode_status(version_id: DbId, status_id: StatusId) -> Result<ShortlistStatus, CoreError> {
    ShortlistStatus::from_id(status_id).ok_or_else(|| {
        CoreError::Internal(format!(
            "Shortlist version {version_id} has unknown status_at_time_id {status_id}"
        ))
    })
}

/// A row from the `shortlist_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShortlistVersion {
    pub id: DbId,
    pub shortlist_id: DbId,
    pub version_number: VersionNumber,
    pub status_at_time_id: StatusId,
    pub share_token: String,
    pub created_at: Timestamp,
    pub submitted_at: Option<Timestamp>,
}

impl ShortlistVersion {
    pub fn status_at_time(&self) -> Result<ShortlistStatus, CoreError> {
        decode_status(self.id, self.status_at_time_id)
    }
}

/// A row from the `shortlist_version_items` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ShortlistVersionItem {
    pub id: DbId,
    pub version_id: DbId,
    pub plant_id: DbId,
    pub quantity: i32,
    pub note: Option<String>,
    pub why_picked: Option<String>,
    pub position: i32,
}

/// The two columns of a version the workflow rules need.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct VersionHistoryRow {
    pub id: DbId,
    pub version_number: VersionNumber,
    pub status_at_time_id: StatusId,
}

impl VersionHistoryRow {
    pub fn record(&self) -> Result<VersionRecord, CoreError> {
        Ok(VersionRecord::new(
            self.version_number,
            decode_status(self.id, self.status_at_time_id)?,
        ))
    }
}

/// A version row with its item count, for history listings.
#[derive(Debug, Clone, FromRow)]
pub struct VersionSummaryRow {
    pub id: DbId,
    pub shortlist_id: DbId,
    pub version_number: VersionNumber,
    pub status_at_time_id: StatusId,
    pub share_token: String,
    pub created_at: Timestamp,
    pub submitted_at: Option<Timestamp>,
    pub item_count: i64,
}

/// History entry returned by the versions listing.
#[derive(Debug, Clone, Serialize)]
pub struct VersionSummary {
    pub id: DbId,
    pub shortlist_id: DbId,
    pub version_number: VersionNumber,
    pub status_at_time: ShortlistStatus,
    pub share_token: String,
    pub item_count: i64,
    pub created_at: Timestamp,
    pub submitted_at: Option<Timestamp>,
}

impl TryFrom<VersionSummaryRow> for VersionSummary {
    type Error = CoreError;

    fn try_from(row: VersionSummaryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status_at_time: decode_status(row.id, row.status_at_time_id)?,
            id: row.id,
            shortlist_id: row.shortlist_id,
            version_number: row.version_number,
            share_token: row.share_token,
            item_count: row.item_count,
            created_at: row.created_at,
            submitted_at: row.submitted_at,
        })
    }
}

/// One version with its decorated items.
#[derive(Debug, Clone, Serialize)]
pub struct VersionDetail {
    pub id: DbId,
    pub shortlist_id: DbId,
    pub version_number: VersionNumber,
    pub status_at_time: ShortlistStatus,
    pub share_token: String,
    pub items: Vec<ShortlistItemView>,
    pub created_at: Timestamp,
    pub submitted_at: Option<Timestamp>,
}

/// What a customer sees behind a share link.
#[derive(Debug, Clone, Serialize)]
pub struct PublicVersionView {
    pub shortlist_title: String,
    pub shortlist_description: Option<String>,
    pub version_number: VersionNumber,
    pub status: ShortlistStatus,
    /// False once the customer has submitted, or for a link that was never
    /// finalizable.
    pub can_finalize: bool,
    pub items: Vec<ShortlistItemView>,
    pub submitted_at: Option<Timestamp>,
}

/// A customer's change to one version item.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeItemEdit {
    pub item_id: DbId,
    pub quantity: i32,
    /// Replaces the item note when present; omitted keeps the staff note.
    pub note: Option<String>,
}

/// The customer's submission for a version.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeShortlist {
    pub items: Vec<FinalizeItemEdit>,
}

/// Result of sealing a version.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizeOutcome {
    pub version_number: VersionNumber,
    pub status: ShortlistStatus,
    pub submitted_at: Option<Timestamp>,
    /// Whether the shortlist's stored status moved to `CUSTOMER_SUBMITTED`.
    pub shortlist_advanced: bool,
}

/// Result of publishing a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub shortlist_id: DbId,
    pub version_number: VersionNumber,
    pub share_token: String,
    pub status: ShortlistStatus,
    pub item_count: u64,
}

/// Result of revising (or sending back) a shortlist into a new draft.
#[derive(Debug, Clone, Serialize)]
pub struct ReviseOutcome {
    pub shortlist_id: DbId,
    pub new_version_number: VersionNumber,
    pub source_version_number: VersionNumber,
    pub status: ShortlistStatus,
    pub item_count: u64,
}
