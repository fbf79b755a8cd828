//! Error types for gardenbook-core

use std::fmt;

use thiserror::Error;

/// Result type alias for gardenbook operations
pub type Result<T> = std::result::Result<T, GardenError>;

/// The record type an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Garden,
    Plant,
}

impl Entity {
    /// Backing table name
    pub fn table(self) -> &'static str {
        match self {
            Entity::Garden => "gardens",
            Entity::Plant => "plants",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Garden => write!(f, "Garden"),
            Entity::Plant => write!(f, "Plant"),
        }
    }
}

/// Main error type for gardenbook operations
#[derive(Error, Debug)]
pub enum GardenError {
    /// No record with the given id
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: i64 },

    /// More than one record matched where exactly one was required
    #[error("Expected exactly one {entity} with id {id}, found {count}")]
    Ambiguous { entity: Entity, id: i64, count: i64 },

    /// A form field could not be coerced to its typed value
    #[error("Invalid value for field '{field}': {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// The store rejected a write (length limit, foreign key, ...)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Persistence-related errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl GardenError {
    pub fn not_found(entity: Entity, id: i64) -> Self {
        GardenError::NotFound { entity, id }
    }

    pub fn invalid_field(field: &'static str, value: impl Into<String>) -> Self {
        GardenError::InvalidField {
            field,
            value: value.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GardenError::InvalidField { .. } | GardenError::Constraint(_)
        )
    }
}

/// Persistence-specific errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        PersistenceError::Database(err.to_string())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

impl From<rusqlite::Error> for GardenError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                GardenError::Constraint(
                    message.clone().unwrap_or_else(|| failure.to_string()),
                )
            }
            other => GardenError::Persistence(PersistenceError::from(other)),
        }
    }
}

/// Errors that can occur when loading server settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("TOML parse error: {0}")]
    Parse(String),
}
