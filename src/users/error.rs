use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use super::dto::ErrorBody;
use super::repo::StoreError;

/// Everything a user request can fail with.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid identifier {input:?}: {source}")]
    InvalidIdentifier {
        input: String,
        #[source]
        source: uuid::Error,
    },

    #[error("invalid date_of_birth {input:?}, expected YYYY-MM-DDThh:mm:ss+00:00: {source}")]
    InvalidTimestamp {
        input: String,
        #[source]
        source: time::error::Parse,
    },

    #[error("{field} must be at most {max} characters")]
    InvalidField { field: &'static str, max: usize },

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("body id {body} does not match path id {path}")]
    IdentifierMismatch { path: Uuid, body: Uuid },

    #[error("User not found")]
    NotFound,

    #[error("user conflicts with an existing user: {0}")]
    Conflict(String),

    #[error("store did not answer in time")]
    Timeout,

    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::NotFound,
            StoreError::Conflict { constraint } => {
                Self::Conflict(constraint.unwrap_or_else(|| "unique constraint".into()))
            }
            StoreError::Timeout => Self::Timeout,
            StoreError::Database(e) => Self::Store(e),
        }
    }
}

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidIdentifier { .. }
            | Self::InvalidTimestamp { .. }
            | Self::InvalidField { .. }
            | Self::InvalidBody(_)
            | Self::IdentifierMismatch { .. }
            | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Timeout | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            Self::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::IdentifierMismatch { .. } => "IDENTIFIER_MISMATCH",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Timeout => "STORE_TIMEOUT",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Backend details stay in the logs.
            Self::Store(e) => {
                tracing::error!(error = ?e, "store error");
                "internal store error".to_string()
            }
            Self::Timeout => {
                tracing::error!("store timeout");
                self.to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: message,
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
