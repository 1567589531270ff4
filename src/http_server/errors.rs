//! # API Errors
//!
//! Every failure a request can end in, with its status code. Bodies are
//! `{"error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::database::DbError;

/// Result type for request handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("Missing sql parameter")]
    MissingSqlParam,

    #[error("Missing sql field in body")]
    MissingSqlField,

    #[error("Only SELECT statements are allowed in GET")]
    SelectOnly,

    #[error("Only INSERT statements are allowed in POST")]
    InsertOnly,

    #[error("Invalid data format")]
    InvalidDataFormat,

    #[error("Not Found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Body over the router's size limit
    #[error("Payload Too Large")]
    PayloadTooLarge,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Database failure; the detail is logged, never sent
    #[error("Internal Server Error")]
    Database(#[from] DbError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingSqlParam
            | ApiError::MissingSqlField
            | ApiError::SelectOnly
            | ApiError::InsertOnly
            | ApiError::InvalidDataFormat => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingSqlParam.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidDataFormat.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::PayloadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::from(DbError::Execution("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_detail_not_exposed() {
        let err = ApiError::from(DbError::Execution("Access denied for user 'root'".into()));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.error, "Internal Server Error");
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ErrorResponse::from(&ApiError::SelectOnly)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": "Only SELECT statements are allowed in GET"})
        );
    }
}
