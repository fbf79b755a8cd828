//! HTTP endpoint handlers
//!
//! Writes answer with an empty `200 OK`; reads answer with JSON.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    Form, Json,
};

use gardenbook_core::{
    Garden, GardenFields, GardenForm, GardenId, GardenSearchForm, Plant, PlantFields, PlantForm,
    PlantId, PlantRow, PlantSearch, PlantSearchForm,
};

use crate::error::ApiError;
use crate::AppState;

// ============================================================================
// Garden Endpoints
// ============================================================================

/// List every garden
pub async fn list_gardens(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Garden>>, ApiError> {
    let gardens = state.repository()?.list_gardens()?;
    Ok(Json(gardens))
}

/// Create a garden
pub async fn create_garden(
    State(state): State<Arc<AppState>>,
    form: Result<Form<GardenForm>, FormRejection>,
) -> Result<StatusCode, ApiError> {
    let Form(form) = form?;
    let fields = GardenFields::from(form);

    state.repository()?.create_garden(&fields)?;
    Ok(StatusCode::OK)
}

/// Replace a garden's name and notes
pub async fn update_garden(
    State(state): State<Arc<AppState>>,
    Path(id): Path<GardenId>,
    form: Result<Form<GardenForm>, FormRejection>,
) -> Result<StatusCode, ApiError> {
    let Form(form) = form?;
    let fields = GardenFields::from(form);

    state.repository()?.update_garden(id, &fields)?;
    Ok(StatusCode::OK)
}

/// Look up a garden by id
pub async fn search_gardens(
    State(state): State<Arc<AppState>>,
    form: Result<Form<GardenSearchForm>, FormRejection>,
) -> Result<Json<Vec<Garden>>, ApiError> {
    let Form(form) = form?;
    let id = form.garden_id()?;

    let gardens = state.repository()?.search_gardens(id)?;
    Ok(Json(gardens))
}

/// Delete a garden
pub async fn delete_garden(
    State(state): State<Arc<AppState>>,
    Path(id): Path<GardenId>,
) -> Result<StatusCode, ApiError> {
    let mut repo = state.repository()?;
    repo.delete_garden(id)?;
    Ok(StatusCode::OK)
}

/// Plants planted in a garden
pub async fn list_garden_plants(
    State(state): State<Arc<AppState>>,
    Path(id): Path<GardenId>,
) -> Result<Json<Vec<Plant>>, ApiError> {
    let plants = state.repository()?.list_garden_plants(id)?;
    Ok(Json(plants))
}

// ============================================================================
// Plant Endpoints
// ============================================================================

/// Create a plant
pub async fn create_plant(
    State(state): State<Arc<AppState>>,
    form: Result<Form<PlantForm>, FormRejection>,
) -> Result<StatusCode, ApiError> {
    let Form(form) = form?;
    let fields = PlantFields::try_from(form)?;

    state.repository()?.create_plant(&fields)?;
    Ok(StatusCode::OK)
}

/// Replace every field of a plant
pub async fn update_plant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PlantId>,
    form: Result<Form<PlantForm>, FormRejection>,
) -> Result<StatusCode, ApiError> {
    let Form(form) = form?;
    let fields = PlantFields::try_from(form)?;

    state.repository()?.update_plant(id, &fields)?;
    Ok(StatusCode::OK)
}

/// Search plants; results are field tuples
pub async fn search_plants(
    State(state): State<Arc<AppState>>,
    form: Result<Form<PlantSearchForm>, FormRejection>,
) -> Result<Json<Vec<PlantRow>>, ApiError> {
    let Form(form) = form?;
    let search = PlantSearch::try_from(form)?;

    let rows: Vec<PlantRow> = state
        .repository()?
        .search_plants(&search)?
        .into_iter()
        .map(Plant::into_row)
        .collect();
    Ok(Json(rows))
}

/// Delete a plant
pub async fn delete_plant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PlantId>,
) -> Result<StatusCode, ApiError> {
    let mut repo = state.repository()?;
    repo.delete_plant(id)?;
    Ok(StatusCode::OK)
}
