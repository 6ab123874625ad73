//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Fatal startup errors from schema reflection. Never produced on a request path.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("required table '{table}' does not exist in the database")]
    TableMissing { table: String },
    #[error("table '{table}' has no primary key")]
    NoPrimaryKey { table: String },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("missing required columns for {entity}: {columns:?}")]
    MissingColumns {
        entity: &'static str,
        columns: Vec<String>,
    },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    NotAllowed(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) | ApiError::UnknownResource(_) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            ApiError::MissingColumns { .. } => (StatusCode::BAD_REQUEST, "missing_columns"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::NotAllowed(_) => (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
            ApiError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            }
        };
        let details = match &self {
            ApiError::MissingColumns { columns, .. } => {
                Some(serde_json::json!({ "columns": columns }))
            }
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
