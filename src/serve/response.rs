//! Response construction for served resources.
//!
//! # Responsibilities
//! - Emit `Content-Type`, `Content-Length`, `Vary` and `Content-Encoding`
//! - Stream the opened file as the response body
//!
//! # Design Decisions
//! - Headers are committed before the body; a read error mid-stream is only
//!   logged, the client sees a truncated body
//! - The file handle lives inside the body stream and is closed when the
//!   stream is dropped, whether it completed or not

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use super::Served;

impl<F> IntoResponse for Served<F>
where
    F: AsyncRead + Send + Unpin + 'static,
{
    fn into_response(self) -> Response {
        let key = self.key;
        let stream = ReaderStream::new(self.file).inspect_err(move |e| {
            tracing::error!(path = %key, error = %e, "Copy error");
        });

        let mut response = Response::new(Body::from_stream(stream));
        *response.status_mut() = StatusCode::OK;

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(self.content_type),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(self.content_length));
        headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
        if let Some(encoding) = self.encoding {
            headers.insert(
                header::CONTENT_ENCODING,
                HeaderValue::from_static(encoding.content_encoding),
            );
        }
        response
    }
}
