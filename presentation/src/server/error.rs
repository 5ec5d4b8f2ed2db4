//! JSON error responses for the chat server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chorus_application::AskError;
use serde::Serialize;

/// `{ "error": { "code": "bad_request", "message": "..." } }`
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

/// Error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

pub fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

impl From<AskError> for AppError {
    fn from(err: AskError) -> Self {
        match err {
            AskError::NoProviders => AppError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                code: "no_providers",
                message: err.to_string(),
            },
            AskError::Domain(ref domain) if domain.is_input_error() => bad_request(err.to_string()),
            AskError::Domain(_) => AppError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "internal",
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorus_domain::DomainError;

    #[test]
    fn test_ask_error_status() {
        assert_eq!(
            AppError::from(AskError::NoProviders).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(AskError::Domain(DomainError::InvalidQuestion("empty".into()))).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(AskError::Domain(DomainError::UnknownPolicy("x".into()))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
