use axum::{
    http::{StatusCode, header},
    response::IntoResponse,
};
use thiserror::Error;

use crate::error::GrabError;

pub const INSPECTION_FAILED_MESSAGE: &str = "Error: Could not fetch video. Try a different link.";
pub const DOWNLOAD_FAILED_MESSAGE: &str =
    "Error Downloading: the selected format could not be retrieved.";

/// Errors surfaced to HTTP clients
///
/// Bodies are fixed plain text; engine detail never leaves the process.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Grab(#[from] GrabError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::Grab(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::MissingField(field) => format!("Error: missing {field}"),
            ApiError::Grab(GrabError::InspectionFailed(_)) => INSPECTION_FAILED_MESSAGE.to_string(),
            ApiError::Grab(GrabError::RetrievalFailed(_)) | ApiError::Internal(_) => {
                DOWNLOAD_FAILED_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(cause) = &self {
            tracing::error!(cause, "Request failed");
        }

        (
            self.status_code(),
            [(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())],
            self.message(),
        )
            .into_response()
    }
}
