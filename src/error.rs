use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::response::ApiResponse;
use crate::users::error::UserError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field that failed validation, reported together.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[cfg(test)]
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed with {} errors", self.errors.len())
    }
}

/// Errors a handler can return; maps onto status codes and the error envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    User(#[from] UserError),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::User(err) => match err {
                UserError::AlreadyExists => StatusCode::CONFLICT,
                UserError::NotFound => StatusCode::NOT_FOUND,
                UserError::InvalidCredentials | UserError::AccountInactive => {
                    StatusCode::UNAUTHORIZED
                }
                UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(errors) => ApiResponse::<()>::error(errors),
            ApiError::BadRequest(msg) => ApiResponse::<()>::error(msg),
            ApiError::User(UserError::Internal(source)) => {
                tracing::error!(error = ?source, "internal error");
                ApiResponse::<()>::error("Internal server error")
            }
            ApiError::User(UserError::NotFound) => ApiResponse::<()>::error("User not found"),
            ApiError::User(err) => ApiResponse::<()>::error(err.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_map_to_distinct_statuses() {
        let cases = [
            (UserError::AlreadyExists, StatusCode::CONFLICT),
            (UserError::NotFound, StatusCode::NOT_FOUND),
            (UserError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (UserError::AccountInactive, StatusCode::UNAUTHORIZED),
            (
                UserError::Internal(anyhow::anyhow!("db down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn validation_errors_collect_fields() {
        let mut errors = ValidationErrors::default();
        assert!(errors.clone().into_result().is_ok());

        errors.add("email", "email must be a valid email");
        errors.add("password", "password must be at least 8 characters");
        assert!(errors.has("email"));
        assert!(!errors.has("phone"));
        assert_eq!(errors.to_string(), "validation failed with 2 errors");
        assert!(errors.into_result().is_err());
    }
}
