//! Gardenbook Core - record keeping for gardens and their plants
//!
//! This crate provides everything below the HTTP surface:
//!
//! - **Model**: `Garden` and `Plant` records and the one-to-many relationship between them
//! - **Command**: Typed commands parsed from raw form fields at the boundary
//! - **Persistence**: SQLite schema and the `Repository` that runs every query and command
//! - **Config**: Server settings loaded from a TOML file and environment overrides
//!
//! # Architecture
//!
//! ```text
//! form fields → command → Repository → SQLite
//!                              ↓
//!                        Garden / Plant rows
//! ```
//!
//! The repository is an explicit handle. Callers own it (or a lock around it)
//! and pass it to each operation; there is no process-wide session.

pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod persistence;

pub use command::{
    GardenFields, GardenForm, GardenSearchForm, PlantFields, PlantForm, PlantSearch,
    PlantSearchForm,
};
pub use config::ServerConfig;
pub use error::{ConfigError, Entity, GardenError, PersistenceError, Result};
pub use model::{Garden, GardenId, Plant, PlantId, PlantRow};
pub use persistence::{Repository, Schema, NAME_MAX_LEN, NOTES_MAX_LEN};
