//! Write guards for draft items, customer finalization and deletion.

use super::history::VersionCounters;
use crate::error::CoreError;
use crate::status::ShortlistStatus;
use crate::types::VersionNumber;

/// Authorize a staff write to the draft items.
///
/// Rejected while the stored status is `CUSTOMER_SUBMITTED` or while the
/// draft lineage has not moved past the last customer-submitted version:
/// the draft would still be the basis of a confirmed snapshot. Staff must
/// revise first. A procured shortlist is never editable. With no submitted
/// version there is nothing to protect, so a fresh counter of 0 is fine.
pub fn check_draft_editable(
    stored: ShortlistStatus,
    counters: &VersionCounters,
) -> Result<(), CoreError> {
    match stored {
        ShortlistStatus::CustomerSubmitted => Err(CoreError::Forbidden(
            "Customer has submitted this shortlist; revise it to make changes".to_string(),
        )),
        ShortlistStatus::ToBeProcured => Err(CoreError::Forbidden(
            "Shortlist is marked for procurement and can no longer be edited".to_string(),
        )),
        _ if counters.submitted_max > 0 && !counters.is_past_submitted() => {
            Err(CoreError::Forbidden(format!(
                "Draft has not moved past submitted version {}; revise it to make changes",
                counters.submitted_max
            )))
        }
        _ => Ok(()),
    }
}

/// Optimistic concurrency check for draft saves.
pub fn check_expected_version(
    expected: Option<VersionNumber>,
    current: VersionNumber,
) -> Result<(), CoreError> {
    match expected {
        Some(expected) if expected != current => Err(CoreError::Conflict(format!(
            "Shortlist was modified concurrently: expected version {expected}, found {current}"
        ))),
        _ => Ok(()),
    }
}

/// Authorize the customer's one-time edit-and-seal of a version.
pub fn check_finalizable(status_at_time: ShortlistStatus) -> Result<(), CoreError> {
    match status_at_time {
        ShortlistStatus::SentToCustomer => Ok(()),
        ShortlistStatus::CustomerSubmitted => Err(CoreError::Forbidden(
            "This shortlist has already been submitted".to_string(),
        )),
        other => Err(CoreError::Forbidden(format!(
            "A version in status {other} cannot be submitted"
        ))),
    }
}

/// A shortlist can only be deleted before anything was sent.
pub fn check_deletable(version_count: i64) -> Result<(), CoreError> {
    if version_count > 0 {
        return Err(CoreError::Forbidden(format!(
            "Shortlist has {version_count} sent version(s) and cannot be deleted"
        )));
    }
    Ok(())
}
