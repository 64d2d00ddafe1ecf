//! Shortlist versioning workflow: status machine, version history,
//! item-set selection and mutation guards.
//!
//! A shortlist carries a mutable draft lineage (its draft items plus the
//! `current_version_number` counter) and an append-only list of versions,
//! each an immutable snapshot sent to the customer. The functions here
//! decide what may happen next given those two inputs; the database layer
//! runs them inside the transaction that performs the write.

pub mod guard;
pub mod history;
pub mod selection;
pub mod transitions;
pub mod validation;

pub use guard::{check_deletable, check_draft_editable, check_expected_version, check_finalizable};
pub use history::{derive_status, VersionCounters, VersionRecord};
pub use selection::{has_unsent_changes, select_item_source, ItemSource};
pub use transitions::{
    allocate_version_number, check_mark_procured, check_publish, check_revise, check_send_back,
    finalize_advances_shortlist, revise_source, VersionAllocation,
};
