use std::fmt::Display;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Every failure the API reports. The cause is logged where the error is
/// raised and never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    BadRequest,
    NotFound,
    MethodNotAllowed,
    Unprocessable,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ApiError::BadRequest => "this is a bad request",
            ApiError::NotFound => "requested resource not found",
            ApiError::MethodNotAllowed => "this method is not alllowed",
            ApiError::Unprocessable => "your request cannot be processed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Collapses any failure into the bucket of the route that hit it.
pub trait OrApiError<T> {
    fn or_api_error(self, error: ApiError) -> Result<T, ApiError>;

    fn or_bad_request(self) -> Result<T, ApiError>
    where
        Self: Sized,
    {
        self.or_api_error(ApiError::BadRequest)
    }

    fn or_not_found(self) -> Result<T, ApiError>
    where
        Self: Sized,
    {
        self.or_api_error(ApiError::NotFound)
    }

    fn or_unprocessable(self) -> Result<T, ApiError>
    where
        Self: Sized,
    {
        self.or_api_error(ApiError::Unprocessable)
    }
}

impl<T, E: Display> OrApiError<T> for Result<T, E> {
    fn or_api_error(self, error: ApiError) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::error!(status = error.status().as_u16(), "request failed: {e}");
            error
        })
    }
}

/// Gives framework-generated 405 responses the same body as every other error.
/// The `Allow` header listing the route's methods is carried over.
pub async fn envelope_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let mut envelope = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        envelope.headers_mut().insert(header::ALLOW, allow.clone());
    }
    envelope
}
