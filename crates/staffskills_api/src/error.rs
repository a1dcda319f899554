//! HTTP error mapping.
//!
//! # Invariants
//! - Not-found maps to 404, validation to 400, everything else to 500.
//! - 500 bodies never carry store details; those go to the log only.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::{Deserialize, Serialize};
use staffskills_core::{PersonId, PersonServiceError};
use std::fmt::Display;

const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// JSON body returned with every non-2xx response produced by handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(PersonId),
    Validation(String),
    Internal,
}

impl ApiError {
    /// Logs `err` under `op` and returns an opaque 500.
    pub fn internal(op: &'static str, err: impl Display) -> Self {
        error!("event={op} module=api status=error error={err}");
        Self::Internal
    }

    /// Maps a service failure for operation `op`.
    pub fn from_service(op: &'static str, err: PersonServiceError) -> Self {
        match err {
            PersonServiceError::Validation(err) => Self::Validation(err.to_string()),
            other => Self::internal(op, other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::NotFound(id) => format!("person with id {id} not found"),
            Self::Validation(message) => message.clone(),
            Self::Internal => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Malformed bodies and values that do not fit the request shape are
/// client input errors, reported like any other validation failure.
impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Validation(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use staffskills_core::{PersonServiceError, PersonValidationError, RepoError};

    #[test]
    fn service_errors_map_to_expected_statuses() {
        let validation = ApiError::from_service(
            "person_create",
            PersonServiceError::Validation(PersonValidationError::SkillLevelOutOfRange {
                skill: "X".to_string(),
                level: 11,
            }),
        );
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let store = ApiError::from_service(
            "person_create",
            PersonServiceError::Repo(RepoError::InvalidData("broken".to_string())),
        );
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!store.message().contains("broken"));

        assert_eq!(ApiError::NotFound(7).status(), StatusCode::NOT_FOUND);
    }
}
