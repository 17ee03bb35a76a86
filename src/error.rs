use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON body for every failed request: `{"error": "...", "code": "..."}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable code such as "CITY_NOT_FOUND"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn with_code(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
        }
    }

    pub fn from_error<E: HttpError + ?Sized>(err: &E) -> Self {
        Self {
            error: err.to_string(),
            code: err.error_code().map(str::to_string),
        }
    }
}

/// Errors that know which HTTP status they map to
pub trait HttpError: std::error::Error {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> Option<&'static str> {
        None
    }

    /// Log the failure and render it as an `ErrorResponse`
    ///
    /// Server-side failures log at error level, rejected requests at warn.
    fn to_response(&self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from_error(self);

        if status.is_server_error() {
            tracing::error!(
                error = %body.error,
                status = %status,
                code = ?body.code,
                "Request failed"
            );
        } else {
            tracing::warn!(
                error = %body.error,
                status = %status,
                code = ?body.code,
                "Request rejected"
            );
        }

        (status, Json(body)).into_response()
    }
}

/// Implement `IntoResponse` for an `HttpError` type
#[macro_export]
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                $crate::error::HttpError::to_response(&self)
            }
        }
    };
}
