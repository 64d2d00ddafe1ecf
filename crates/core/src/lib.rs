//! Domain logic for the shortlist versioning workflow.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` crate
//! feeds it counters and version history loaded inside a transaction, and
//! the `api` crate maps its errors onto HTTP responses.

pub mod error;
pub mod share_token;
pub mod shortlist;
pub mod status;
pub mod types;
