//! Page errors and their HTTP mapping.
//!
//! DESIGN
//! ======
//! Loader and action failures surface verbatim to the client as a status code
//! with a short text body. Store failures are logged and collapsed into a
//! generic 500 so database details never leak into responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::store::StoreError;

/// Grepable error code attached to every error type that crosses a module
/// boundary. Codes are stable identifiers for log searches.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const USER_NOT_FOUND: &str = "User not found";
pub const COLLECTION_NOT_FOUND: &str = "Collection not found";
pub const FRAME_NOT_FOUND: &str = "Frame not found";

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("User does not match")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl PageError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorCode for PageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Forbidden => "E_FORBIDDEN",
            Self::BadRequest(_) => "E_BAD_REQUEST",
            Self::Store(_) => "E_STORE",
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
            return (status, "Internal Server Error").into_response();
        }

        tracing::debug!(error = %self, code = self.error_code(), %status, "request rejected");
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
