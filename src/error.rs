use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    MissingReference(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized")]
    Unauthorized,
}

impl CatalogError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        CatalogError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// Map constraint violations reported by the database onto catalog
    /// errors; anything else stays a raw database error.
    pub fn from_write(err: SqlxError, subject: &str) -> Self {
        if let SqlxError::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return CatalogError::Conflict(format!(
                    "a {subject} with this slug already exists"
                ));
            }
            if db_err.is_foreign_key_violation() {
                return CatalogError::MissingReference(format!(
                    "{subject} references a record that does not exist"
                ));
            }
        }
        CatalogError::DatabaseError(err)
    }
}

impl From<figment::Error> for CatalogError {
    fn from(e: figment::Error) -> Self {
        CatalogError::ConfigError(Box::new(e))
    }
}

impl From<JsonRejection> for CatalogError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return CatalogError::PayloadTooLarge(rejection.body_text());
        }
        CatalogError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for CatalogError {
    fn from(rejection: PathRejection) -> Self {
        CatalogError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for CatalogError {
    fn from(rejection: QueryRejection) -> Self {
        CatalogError::Validation(rejection.body_text())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            CatalogError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            CatalogError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            CatalogError::MissingReference(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_REFERENCE")
            }
            CatalogError::Validation(_) | CatalogError::JsonError(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT")
            }
            CatalogError::PayloadTooLarge(_) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE")
            }
            CatalogError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            CatalogError::DatabaseError(_)
            | CatalogError::IoError(_)
            | CatalogError::ConfigError(_) => {
                error!(error = %self, "request failed with internal error");
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                };
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiErrorResponse { error: body }),
                )
                    .into_response();
            }
        };
        let body = ApiErrorBody {
            code: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
