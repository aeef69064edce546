use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::store::StoreError;
use crate::validation::ValidationError;

/// Fixed body for every rejected restaurant pizza; the actual reason is
/// only logged.
pub const VALIDATION_ERRORS_MESSAGE: &str = "validation errors";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Restaurant not found")]
    RestaurantNotFound,
    #[error("Not Found")]
    UnknownPath,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Store failure while creating a restaurant pizza.
    #[error(transparent)]
    Creation(StoreError),
    /// Store failure while listing pizzas.
    #[error(transparent)]
    PizzaListing(StoreError),
    /// Any other store failure; the message is not sent to the client.
    #[error(transparent)]
    Internal(StoreError),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorsResponse {
    /// Error messages
    pub errors: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::RestaurantNotFound => (
                StatusCode::NOT_FOUND,
                Json(ApiErrorResponse {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            ApiError::UnknownPath => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            ApiError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                Json(ApiErrorsResponse {
                    errors: vec![VALIDATION_ERRORS_MESSAGE.to_string()],
                }),
            )
                .into_response(),
            ApiError::Creation(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorsResponse {
                    errors: vec![e.to_string()],
                }),
            )
                .into_response(),
            ApiError::PizzaListing(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response(),
            ApiError::Internal(e) => {
                error!(error = %e, "unhandled store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::RestaurantNotFound, StatusCode::NOT_FOUND),
            (ApiError::UnknownPath, StatusCode::NOT_FOUND),
            (
                ApiError::Validation(ValidationError::PriceOutOfRange(31)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Creation(StoreError::Worker("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::PizzaListing(StoreError::Worker("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Internal(StoreError::Worker("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
