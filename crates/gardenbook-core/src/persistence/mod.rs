//! Persistence layer for gardenbook
//!
//! Provides SQLite-backed storage for gardens and plants.

mod repository;
mod schema;

pub use repository::Repository;
pub use schema::{Schema, NAME_MAX_LEN, NOTES_MAX_LEN};
