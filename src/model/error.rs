use std::sync::PoisonError;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde::{Deserialize, Serialize};

use super::transaction::TransactionId;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed for {} field(s)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("transaction {0} not found")]
    NotFound(TransactionId),

    /// The transaction's `datetime` is older than the edit window.
    #[error("transaction {0} is past its edit window")]
    EditWindowExpired(TransactionId),

    /// The request body could not be read as a JSON object.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("invalid date range: {0}")]
    InvalidRange(String),

    /// Anything the store reported. The detail is logged, never returned.
    #[error("store failure: {0}")]
    StoreFailure(String),

    #[error("path {0} not found")]
    PathNotFound(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> FieldError {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    reason: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl From<rusqlite::Error> for ApiError {
    fn from(value: rusqlite::Error) -> ApiError {
        error!("rusqlite error: {}", value);
        ApiError::StoreFailure(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> ApiError {
        ApiError::InvalidBody(value.body_text())
    }
}

impl<T> From<PoisonError<T>> for ApiError {
    fn from(value: PoisonError<T>) -> ApiError {
        error!("database lock poisoned: {}", value);
        ApiError::StoreFailure(String::from("database lock poisoned"))
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationFailed(_) | Self::InvalidBody(_) | Self::InvalidRange(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) | Self::PathNotFound(_) => StatusCode::NOT_FOUND,
            Self::EditWindowExpired(_) => StatusCode::FORBIDDEN,
            Self::StoreFailure(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_reason(&self) -> String {
        match self {
            Self::ValidationFailed(_) => String::from("Validation failed"),
            Self::NotFound(_) => String::from("Transaction not found"),
            Self::EditWindowExpired(_) => String::from("Cannot edit transaction after 12 hours"),
            Self::InvalidBody(reason) => format!("Invalid request body: {}", reason),
            Self::InvalidRange(reason) => reason.clone(),
            Self::PathNotFound(path) => format!("Requested path '{}' not found", path),
            Self::StoreFailure(_) | Self::InternalError(_) => String::from("Internal Error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let public_reason = self.public_reason();

        if status_code.is_server_error() {
            warn!("{} response for {}", status_code, self);
        } else {
            warn!(
                "{} response with public_reason={}",
                status_code, public_reason
            );
        }

        let errors = match self {
            Self::ValidationFailed(errors) => errors,
            _ => Vec::new(),
        };

        (
            status_code,
            Json(ErrorResponse {
                reason: public_reason,
                errors,
            }),
        )
            .into_response()
    }
}
