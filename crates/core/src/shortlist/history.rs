//! Version history summaries and read-time status derivation.

use serde::Serialize;

use crate::status::ShortlistStatus;
use crate::types::VersionNumber;

/// The part of a version row the workflow rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRecord {
    pub version_number: VersionNumber,
    pub status_at_time: ShortlistStatus,
}

impl VersionRecord {
    pub fn new(version_number: VersionNumber, status_at_time: ShortlistStatus) -> Self {
        Self {
            version_number,
            status_at_time,
        }
    }
}

/// The three numbers every selection and guard decision is made from.
///
/// `sent_max` and `submitted_max` are 0 when no version with that
/// `status_at_time` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionCounters {
    pub current: VersionNumber,
    pub sent_max: VersionNumber,
    pub submitted_max: VersionNumber,
}

impl VersionCounters {
    pub fn new(current: VersionNumber, sent_max: VersionNumber, submitted_max: VersionNumber) -> Self {
        Self {
            current,
            sent_max,
            submitted_max,
        }
    }

    /// Summarize a shortlist's counter and version history.
    pub fn from_history(current: VersionNumber, versions: &[VersionRecord]) -> Self {
        let max_with = |status: ShortlistStatus| {
            versions
                .iter()
                .filter(|v| v.status_at_time == status)
                .map(|v| v.version_number)
                .max()
                .unwrap_or(0)
        };

        Self {
            current,
            sent_max: max_with(ShortlistStatus::SentToCustomer),
            submitted_max: max_with(ShortlistStatus::CustomerSubmitted),
        }
    }

    /// Highest version number the customer has been shown, 0 if none.
    pub fn latest_customer_facing(&self) -> VersionNumber {
        self.sent_max.max(self.submitted_max)
    }

    /// Whether the draft lineage has moved past the last customer-confirmed
    /// snapshot.
    pub fn is_past_submitted(&self) -> bool {
        self.current > self.submitted_max
    }
}

/// Reconstruct the status to display from the stored status and the
/// version history.
///
/// `TO_BE_PROCURED` always wins. Otherwise a most-recent version sealed by
/// the customer means `CUSTOMER_SUBMITTED` regardless of what the stored
/// field says, because the stored field can lag behind the history. The
/// stored status is the fallback.
pub fn derive_status(stored: ShortlistStatus, versions: &[VersionRecord]) -> ShortlistStatus {
    if stored == ShortlistStatus::ToBeProcured {
        return stored;
    }

    let latest = versions.iter().max_by_key(|v| v.version_number);
    match latest {
        Some(v) if v.status_at_time == ShortlistStatus::CustomerSubmitted => {
            ShortlistStatus::CustomerSubmitted
        }
        _ => stored,
    }
}
