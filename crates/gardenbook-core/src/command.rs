//! Typed commands and the raw forms they are parsed from
//!
//! Form structs mirror the HTTP form bodies field for field and hold every
//! value as a string. Converting a form into its command is the single place
//! where values are coerced, so a malformed integer becomes
//! [`GardenError::InvalidField`] instead of a store failure.

use serde::Deserialize;

use crate::error::{GardenError, Result};
use crate::model::{GardenId, PlantId};

/// Replacement values for a garden, used by both create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GardenFields {
    pub name: String,
    pub notes: String,
}

impl GardenFields {
    pub fn new(name: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notes: notes.into(),
        }
    }
}

/// Replacement values for a plant, used by both create and update
///
/// Updates replace every field, so `garden_id: None` on update detaches the
/// plant from its garden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantFields {
    pub name: String,
    pub common_name: String,
    pub category: String,
    pub location: String,
    pub year: i32,
    pub notes: String,
    pub garden_id: Option<GardenId>,
}

/// Plant search filters; `None` leaves a field unconstrained
///
/// `name`, `common_name` and `notes` match case-sensitive substrings, the
/// rest match exactly. All supplied filters must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantSearch {
    pub id: Option<PlantId>,
    pub name: Option<String>,
    pub common_name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub notes: Option<String>,
    pub garden_id: Option<GardenId>,
}

impl PlantSearch {
    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Forms
// ============================================================================

/// Form body for garden create/update
#[derive(Debug, Deserialize)]
pub struct GardenForm {
    pub name: String,
    pub notes: String,
}

impl From<GardenForm> for GardenFields {
    fn from(form: GardenForm) -> Self {
        GardenFields {
            name: form.name,
            notes: form.notes,
        }
    }
}

/// Form body for garden search
#[derive(Debug, Deserialize)]
pub struct GardenSearchForm {
    pub id: String,
}

impl GardenSearchForm {
    pub fn garden_id(&self) -> Result<GardenId> {
        parse_required("id", &self.id)
    }
}

/// Form body for plant create/update
#[derive(Debug, Deserialize)]
pub struct PlantForm {
    pub name: String,
    pub common_name: String,
    pub category: String,
    pub location: String,
    pub year: String,
    pub notes: String,
    #[serde(default)]
    pub garden_id: String,
}

impl TryFrom<PlantForm> for PlantFields {
    type Error = GardenError;

    fn try_from(form: PlantForm) -> Result<Self> {
        Ok(PlantFields {
            year: parse_required("year", &form.year)?,
            garden_id: parse_optional("garden_id", &form.garden_id)?,
            name: form.name,
            common_name: form.common_name,
            category: form.category,
            location: form.location,
            notes: form.notes,
        })
    }
}

/// Form body for plant search; empty or omitted fields are unfiltered
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlantSearchForm {
    pub plant_id: String,
    pub name: String,
    pub common_name: String,
    pub category: String,
    pub location: String,
    pub year: String,
    pub notes: String,
    pub garden_id: String,
}

impl TryFrom<PlantSearchForm> for PlantSearch {
    type Error = GardenError;

    fn try_from(form: PlantSearchForm) -> Result<Self> {
        Ok(PlantSearch {
            id: parse_optional("plant_id", &form.plant_id)?,
            year: parse_optional("year", &form.year)?,
            garden_id: parse_optional("garden_id", &form.garden_id)?,
            name: non_empty(form.name),
            common_name: non_empty(form.common_name),
            category: non_empty(form.category),
            location: non_empty(form.location),
            notes: non_empty(form.notes),
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_required<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| GardenError::invalid_field(field, value))
}

fn parse_optional<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<Option<T>> {
    if value.is_empty() {
        Ok(None)
    } else {
        parse_required(field, value).map(Some)
    }
}
