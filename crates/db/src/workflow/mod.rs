//! Transactional shortlist workflow.
//!
//! Every write runs in a single transaction that starts by locking the
//! shortlist row (`SELECT ... FOR UPDATE`). The `frond_core` guards are then
//! evaluated against the locked row and the version history read inside the
//! same transaction, so a check and the write it protects can never be
//! separated by a concurrent request. The first failing guard aborts the
//! transaction with no partial effect.

mod draft;
mod finalize;
mod lifecycle;
mod publish;
mod read;
mod revise;

use std::collections::HashMap;

use frond_core::error::CoreError;
use frond_core::shortlist::{VersionCounters, VersionRecord};
use frond_core::types::{DbId, VersionNumber};
use sqlx::PgConnection;

use crate::models::shortlist::{Shortlist, ShortlistItemView};
use crate::repositories::{PlantRepo, ShortlistRepo, ShortlistVersionRepo};

/// Errors raised by workflow operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Entry point for the shortlist operations. Methods are grouped by concern
/// across the submodules of [`crate::workflow`].
pub struct ShortlistWorkflow;

/// Entity label used in not-found errors.
const SHORTLIST: &str = "Shortlist";

fn shortlist_not_found(id: DbId) -> WorkflowError {
    CoreError::NotFound {
        entity: SHORTLIST,
        id,
    }
    .into()
}

/// Lock a shortlist for the rest of the transaction, or fail with `NotFound`.
async fn lock_shortlist(conn: &mut PgConnection, id: DbId) -> WorkflowResult<Shortlist> {
    ShortlistRepo::lock(conn, id)
        .await?
        .ok_or_else(|| shortlist_not_found(id))
}

/// A shortlist's version history and the counters derived from it.
struct History {
    records: Vec<VersionRecord>,
    counters: VersionCounters,
}

impl History {
    /// Highest version number that exists, 0 if none.
    fn latest_version_number(&self) -> VersionNumber {
        self.records
            .iter()
            .map(|r| r.version_number)
            .max()
            .unwrap_or(0)
    }
}

async fn load_history(conn: &mut PgConnection, shortlist: &Shortlist) -> WorkflowResult<History> {
    let records = ShortlistVersionRepo::history(conn, shortlist.id)
        .await?
        .iter()
        .map(|row| row.record())
        .collect::<Result<Vec<_>, _>>()?;
    let counters = VersionCounters::from_history(shortlist.current_version_number, &records);
    Ok(History { records, counters })
}

/// Attach catalog details to item lines. Lines whose plant is missing from
/// the catalog are returned undecorated.
async fn decorate_items(
    conn: &mut PgConnection,
    items: Vec<ShortlistItemView>,
) -> WorkflowResult<Vec<ShortlistItemView>> {
    let mut plant_ids: Vec<DbId> = items.iter().map(|i| i.plant_id).collect();
    plant_ids.sort_unstable();
    plant_ids.dedup();

    let plants: HashMap<DbId, _> = PlantRepo::find_by_ids(conn, &plant_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    Ok(items
        .into_iter()
        .map(|item| match plants.get(&item.plant_id) {
            Some(plant) => item.with_plant(plant),
            None => item,
        })
        .collect())
}

/// Log a rejected guard check and pass the error through.
fn rejected(operation: &'static str, shortlist_id: DbId, err: CoreError) -> WorkflowError {
    tracing::warn!(shortlist_id, operation, error = %err, "Shortlist operation rejected");
    err.into()
}
