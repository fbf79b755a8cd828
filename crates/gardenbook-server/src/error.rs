//! HTTP error responses

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use gardenbook_core::GardenError;

/// Errors a handler can return; rendered as a status code plus plain text
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Garden(#[from] GardenError),

    /// Missing field or undecodable form body
    #[error("Invalid form: {}", .0.body_text())]
    Form(#[from] FormRejection),

    /// The repository mutex was poisoned by a panicking request
    #[error("Repository unavailable: {0}")]
    Lock(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Garden(GardenError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Garden(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Garden(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Form(_) => StatusCode::BAD_REQUEST,
            ApiError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!("{}", message);
        } else {
            tracing::warn!("{}", message);
        }

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardenbook_core::Entity;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(GardenError::not_found(Entity::Plant, 1));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid = ApiError::from(GardenError::invalid_field("year", "abc"));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let constraint = ApiError::from(GardenError::Constraint("CHECK failed".to_string()));
        assert_eq!(constraint.status(), StatusCode::BAD_REQUEST);

        let ambiguous = ApiError::from(GardenError::Ambiguous {
            entity: Entity::Garden,
            id: 1,
            count: 2,
        });
        assert_eq!(ambiguous.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let lock = ApiError::Lock("poisoned".to_string());
        assert_eq!(lock.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_body() {
        let err = ApiError::from(GardenError::not_found(Entity::Garden, 7));
        assert_eq!(err.to_string(), "Garden not found: 7");
    }
}
