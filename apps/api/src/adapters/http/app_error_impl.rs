use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        let (status, code) = match &self {
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, ErrorCode::InvalidCredentials)
            }
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidInput),
            AppError::EmailTaken => (StatusCode::BAD_REQUEST, ErrorCode::EmailTaken),
            AppError::Expired => (StatusCode::BAD_REQUEST, ErrorCode::Expired),
            AppError::NotFound => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError),
        };

        // Server-side detail stays in the log; the body carries a generic
        // message for those variants.
        let message = match &self {
            AppError::Database(_) | AppError::Internal(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        };

        let body = serde_json::json!({ "code": code.as_str(), "message": message });
        (status, Json(body)).into_response()
    }
}
