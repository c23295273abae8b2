//! Relay error types with HTTP status code mapping.
//!
//! Routing never fails: malformed payloads degrade to an unrecognised
//! category and missing destinations drop the payload. [`RelayError`]
//! covers the remaining fallible edges, the page surface and startup
//! configuration.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Server-side error enum with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// No page is served at this path.
    #[error("no page at {0}")]
    PageNotFound(String),

    /// The static monitor page could not be read.
    #[error("monitor page unavailable: {0}")]
    PageUnavailable(#[from] std::io::Error),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RelayError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::PageNotFound(_) | Self::PageUnavailable(_) => StatusCode::NOT_FOUND,
            Self::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the plain-text body sent to the client.
    ///
    /// I/O details stay in the server log.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::PageNotFound(_) => "Not Found",
            Self::PageUnavailable(_) => "File not found",
            Self::InvalidConfig(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message(),
        )
            .into_response()
    }
}
