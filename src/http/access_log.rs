//! Per-request access log.
//!
//! Wraps the static handler: times the request and emits exactly one
//! structured record whatever the outcome, then records request metrics.
//! Kept outside `serve` so the negotiation logic has no logging harness.

use std::fmt;
use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::http::request::request_id;
use crate::observability::metrics;

/// Headers whose values never reach the log.
const REDACTED: [header::HeaderName; 3] = [
    header::AUTHORIZATION,
    header::COOKIE,
    header::PROXY_AUTHORIZATION,
];

/// Debug view of a header map with credentials masked.
pub struct LoggedHeaders<'a>(pub &'a HeaderMap);

impl fmt::Debug for LoggedHeaders<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.0 {
            if REDACTED.contains(name) {
                map.entry(&name.as_str(), &"[redacted]");
            } else {
                map.entry(&name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
            }
        }
        map.finish()
    }
}

/// Middleware emitting one access-log record per request.
pub async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let request_id = request_id(request.headers()).unwrap_or("-").to_string();
    let request_headers = format!("{:?}", LoggedHeaders(request.headers()));

    let response = next.run(request).await;

    let status = response.status();
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        remote = %remote,
        request_headers = %request_headers,
        status = status.as_u16(),
        response_headers = ?LoggedHeaders(response.headers()),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Request"
    );
    metrics::record_request(method.as_str(), status.as_u16(), start);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn credentials_are_masked() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let out = format!("{:?}", LoggedHeaders(&headers));
        assert!(out.contains("\"accept-encoding\": \"gzip\""));
        assert!(out.contains("[redacted]"));
        assert!(!out.contains("secret"));
    }
}
