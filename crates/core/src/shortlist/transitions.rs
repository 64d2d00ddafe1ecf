//! Allowed status transitions.
//!
//! ```text
//! DRAFT | SENT_BACK_TO_CUSTOMER  --publish-->   SENT_TO_CUSTOMER
//! SENT_TO_CUSTOMER (unsent)      --publish-->   SENT_TO_CUSTOMER   (send update)
//! SENT_TO_CUSTOMER               --finalize-->  CUSTOMER_SUBMITTED (customer)
//! SENT_TO_CUSTOMER (no unsent)   --revise-->    DRAFT
//! CUSTOMER_SUBMITTED             --revise-->    DRAFT
//! CUSTOMER_SUBMITTED             --send back--> SENT_BACK_TO_CUSTOMER
//! any but TO_BE_PROCURED         --procure-->   TO_BE_PROCURED     (terminal)
//! ```

use super::history::VersionCounters;
use crate::error::CoreError;
use crate::status::ShortlistStatus;
use crate::types::VersionNumber;

fn procured_is_terminal(action: &str) -> CoreError {
    CoreError::PreconditionFailed(format!(
        "Shortlist is {} and cannot be {action}",
        ShortlistStatus::ToBeProcured
    ))
}

/// Check that a shortlist may be published (sent or re-sent to the customer).
///
/// Status rules are checked first; an empty draft is a validation error.
pub fn check_publish(
    stored: ShortlistStatus,
    counters: &VersionCounters,
    draft_item_count: i64,
) -> Result<(), CoreError> {
    match stored {
        ShortlistStatus::Draft | ShortlistStatus::SentBackToCustomer => {}
        ShortlistStatus::SentToCustomer => {
            if counters.current <= counters.latest_customer_facing() {
                return Err(CoreError::PreconditionFailed(
                    "Shortlist has no unsent changes to send".to_string(),
                ));
            }
        }
        ShortlistStatus::CustomerSubmitted => {
            return Err(CoreError::PreconditionFailed(
                "Customer has submitted this shortlist; revise it before sending again"
                    .to_string(),
            ));
        }
        ShortlistStatus::ToBeProcured => return Err(procured_is_terminal("published")),
    }

    if draft_item_count == 0 {
        return Err(CoreError::Validation(
            "Cannot send a shortlist with no items".to_string(),
        ));
    }
    Ok(())
}

/// Outcome of allocating a version number for a new snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionAllocation {
    pub version_number: VersionNumber,
    /// Whether the shortlist counter must be advanced to `version_number`.
    pub advances_counter: bool,
}

/// Allocate the version number for a new snapshot.
///
/// Normally this is the shortlist's counter. If the counter has not moved
/// past the newest existing version (e.g. a shortlist published before any
/// draft save), the next number after that version is used and the counter
/// is advanced with it, so numbers never repeat and the counter never falls
/// behind the history.
pub fn allocate_version_number(
    current: VersionNumber,
    latest_version_number: VersionNumber,
) -> VersionAllocation {
    if current > latest_version_number {
        VersionAllocation {
            version_number: current,
            advances_counter: false,
        }
    } else {
        VersionAllocation {
            version_number: latest_version_number + 1,
            advances_counter: true,
        }
    }
}

/// Check that a shortlist may be revised back into an editable draft.
pub fn check_revise(stored: ShortlistStatus, counters: &VersionCounters) -> Result<(), CoreError> {
    match stored {
        ShortlistStatus::CustomerSubmitted => Ok(()),
        ShortlistStatus::SentToCustomer => {
            if counters.current > counters.latest_customer_facing() {
                Err(CoreError::PreconditionFailed(
                    "Shortlist has unsent changes; send the update instead of revising"
                        .to_string(),
                ))
            } else {
                Ok(())
            }
        }
        ShortlistStatus::ToBeProcured => Err(procured_is_terminal("revised")),
        other => Err(CoreError::PreconditionFailed(format!(
            "Cannot revise a shortlist in status {other}"
        ))),
    }
}

/// Check that a submitted shortlist may be sent back to the customer.
pub fn check_send_back(stored: ShortlistStatus) -> Result<(), CoreError> {
    match stored {
        ShortlistStatus::CustomerSubmitted => Ok(()),
        ShortlistStatus::ToBeProcured => Err(procured_is_terminal("sent back")),
        other => Err(CoreError::PreconditionFailed(format!(
            "Only a customer-submitted shortlist can be sent back, status is {other}"
        ))),
    }
}

/// Check that a shortlist may be marked for procurement.
pub fn check_mark_procured(stored: ShortlistStatus) -> Result<(), CoreError> {
    if stored == ShortlistStatus::ToBeProcured {
        return Err(CoreError::PreconditionFailed(
            "Shortlist is already marked for procurement".to_string(),
        ));
    }
    Ok(())
}

/// The version a revise (or send back) clones its draft from: the latest
/// submitted version, else the latest sent one.
pub fn revise_source(counters: &VersionCounters) -> Option<VersionNumber> {
    if counters.submitted_max > 0 {
        Some(counters.submitted_max)
    } else if counters.sent_max > 0 {
        Some(counters.sent_max)
    } else {
        None
    }
}

/// Whether sealing `version_number` should also move the shortlist's stored
/// status to `CUSTOMER_SUBMITTED`.
///
/// Only when the shortlist is still waiting on that exact version: a later
/// version has not been sent and staff have not moved the stored status on
/// (revised, procured).
pub fn finalize_advances_shortlist(
    stored: ShortlistStatus,
    version_number: VersionNumber,
    latest_version_number: VersionNumber,
) -> bool {
    stored == ShortlistStatus::SentToCustomer && version_number >= latest_version_number
}
