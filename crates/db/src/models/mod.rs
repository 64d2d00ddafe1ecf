//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where
//!   the entity is patchable

pub mod customer;
pub mod plant;
pub mod shortlist;
pub mod shortlist_item;
pub mod shortlist_version;
