//! Per-request failure taxonomy.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Terminal failures of a single request.
///
/// Stale or oversized variants are not errors; they are skipped inside the
/// negotiation loop.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// The requested resource (after index fallback) does not exist.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// The resource existed at stat time but could not be opened.
    #[error("failed to open {path}: {source}")]
    Internal {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ServeError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServeError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        if let ServeError::Internal { .. } = self {
            // Variance is declared before negotiation can fail.
            response.headers_mut().insert(
                header::VARY,
                HeaderValue::from_static("Accept-Encoding"),
            );
        }
        response
    }
}
