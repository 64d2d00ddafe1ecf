//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Standalone lookups accept `&PgPool`; methods that take part in a
//! workflow transaction accept `&mut PgConnection` so callers can pass
//! `&mut *tx`.

pub mod customer_repo;
pub mod plant_repo;
pub mod shortlist_item_repo;
pub mod shortlist_repo;
pub mod shortlist_version_repo;

pub use customer_repo::CustomerRepo;
pub use plant_repo::PlantRepo;
pub use shortlist_item_repo::ShortlistItemRepo;
pub use shortlist_repo::ShortlistRepo;
pub use shortlist_version_repo::ShortlistVersionRepo;
