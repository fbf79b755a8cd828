//! Gardenbook Server - garden and plant records over HTTP
//!
//! Form-encoded requests in, JSON (or empty bodies) out.

pub mod error;
pub mod http;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use gardenbook_core::{Repository, ServerConfig};

use crate::error::ApiError;

/// Shared application state
pub struct AppState {
    repository: Mutex<Repository>,
}

impl AppState {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository: Mutex::new(repository),
        }
    }

    /// Open the configured database and build state around it
    pub fn from_config(config: &ServerConfig) -> Result<Self, gardenbook_core::GardenError> {
        let repository = Repository::open(&config.database_url)?;
        tracing::info!("Using database {}", config.database_url);
        Ok(Self::new(repository))
    }

    /// Acquire the repository for the duration of one request
    ///
    /// The guard releases the connection when dropped, on success and error
    /// paths alike.
    pub fn repository(&self) -> Result<MutexGuard<'_, Repository>, ApiError> {
        self.repository
            .lock()
            .map_err(|e| ApiError::Lock(e.to_string()))
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Garden endpoints
        .route("/gardens", get(http::list_gardens))
        .route("/gardens/create", post(http::create_garden))
        .route("/gardens/update/{id}", post(http::update_garden))
        .route("/gardens/search", post(http::search_gardens))
        .route("/gardens/delete/{id}", delete(http::delete_garden))
        .route("/gardens/{id}/plants", get(http::list_garden_plants))
        // Plant endpoints
        .route("/plants/create", post(http::create_plant))
        .route("/plants/update/{id}", post(http::update_plant))
        .route("/plants/search", post(http::search_plants))
        .route("/plants/delete/{id}", delete(http::delete_plant))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Gardenbook server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
