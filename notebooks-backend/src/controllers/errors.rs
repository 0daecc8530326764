//! HTTP mapping of every failure the controllers can return

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use notebooks_types::ErrorResponse;
use thiserror::Error;

use crate::auth::AuthError;
use crate::db::StoreError;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid bearer token, or bad credentials on login
    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("{0}")]
    Validation(ValidationError),

    /// Body that could not be parsed at all
    #[error("{0}")]
    BadRequest(String),

    /// Absent or owned by someone else; deliberately indistinguishable
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Details are logged where the failure happens, never sent to the caller
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Store failure for a resource addressed by id
    pub fn from_store(e: StoreError, resource: &str, id: i64) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound(format!("{} with id {} not found", resource, id)),
            other => other.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        if e.is_transient() {
            log::error!("[DB] {}", e);
            return ApiError::Internal;
        }
        match e {
            StoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            StoreError::Rejected(v) => ApiError::Validation(v),
            StoreError::UnknownOwner => ApiError::Unauthenticated("Invalid or expired token"),
            _ => ApiError::Internal,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => ApiError::Unauthenticated("Invalid user name or password"),
            AuthError::UserNameTaken => ApiError::Conflict("User name is already taken".to_string()),
            AuthError::Validation(v) => ApiError::Validation(v),
            AuthError::Store(store) => store.into(),
            other => {
                log::error!("[AUTH] {}", other);
                ApiError::Internal
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(v) => ErrorResponse::for_field(v.field, v.message.as_str()),
            other => ErrorResponse::new(other.to_string()),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
