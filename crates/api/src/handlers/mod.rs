pub mod public_shortlist;
pub mod shortlist;
pub mod shortlist_version;
