//! Which item set is authoritative for display, and whether staff have
//! edits the customer has not seen.

use serde::Serialize;

use super::history::VersionCounters;
use crate::status::ShortlistStatus;
use crate::types::VersionNumber;

/// Where the items shown for a shortlist come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "version_number", rename_all = "snake_case")]
pub enum ItemSource {
    /// The editable draft items.
    Draft,
    /// The read-only items of the version with this number.
    Version(VersionNumber),
}

impl ItemSource {
    pub fn version_number(self) -> Option<VersionNumber> {
        match self {
            ItemSource::Draft => None,
            ItemSource::Version(n) => Some(n),
        }
    }

    pub fn is_read_only(self) -> bool {
        matches!(self, ItemSource::Version(_))
    }
}

/// Pick the authoritative item set, in priority order:
///
/// 1. Draft items once the counter has moved past the last submitted version.
/// 2. The latest submitted version.
/// 3. The latest sent version, if the counter has not moved past it.
/// 4. Draft items.
///
/// Rule 1 compares against `submitted_max` and rule 3 against `sent_max`.
/// The asymmetry is kept as-is: with no submitted version, rule 1 already
/// selects the draft whenever the counter is above zero.
pub fn select_item_source(counters: &VersionCounters) -> ItemSource {
    if counters.current > counters.submitted_max {
        ItemSource::Draft
    } else if counters.submitted_max > 0 {
        ItemSource::Version(counters.submitted_max)
    } else if counters.sent_max > 0 && counters.current <= counters.sent_max {
        ItemSource::Version(counters.sent_max)
    } else {
        ItemSource::Draft
    }
}

/// True when the customer holds a version and staff have committed edits
/// beyond it. Drives "Send update" versus "Revise".
pub fn has_unsent_changes(displayed: ShortlistStatus, counters: &VersionCounters) -> bool {
    displayed.is_customer_facing() && counters.current > counters.latest_customer_facing()
}
