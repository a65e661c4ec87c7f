//! Error type shared by every handler.
//!
//! Handlers raise `NotFound` and `BadRequest` themselves; everything else is an
//! executor or runtime failure that bubbles up with `?` as `Unhandled` and is
//! turned into a `500` here.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl ApiError {
    /// Missing company, message keeps the requested code for the caller.
    #[must_use]
    pub fn company_not_found(code: &str) -> Self {
        Self::NotFound(format!("There is no company with code of '{code}'"))
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl IntoResponse for ApiError {
    /// Unhandled failures are logged server-side and surfaced without details.
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::NotFound(message) | Self::BadRequest(message) => message,
            Self::Unhandled(err) => {
                error!("Unhandled error: {err:#}");
                status
                    .canonical_reason()
                    .unwrap_or("Internal Server Error")
                    .to_string()
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                message,
                status: status.as_u16(),
            },
        };

        (status, Json(body)).into_response()
    }
}
