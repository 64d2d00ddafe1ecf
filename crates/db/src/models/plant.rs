//! Plant catalog entry, used to decorate shortlist items for display.

use frond_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `plants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Plant {
    pub id: DbId,
    pub name: String,
    pub scientific_name: Option<String>,
    /// Free-text price band as entered in the catalog (e.g. "$20-40").
    pub price_band: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a catalog plant.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlant {
    pub name: String,
    pub scientific_name: Option<String>,
    pub price_band: Option<String>,
}
