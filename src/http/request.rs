//! Request identification.
//!
//! # Responsibilities
//! - Assign a UUID v4 `x-request-id` when the client sent none
//! - Echo the id on the response
//!
//! # Design Decisions
//! - A client-supplied id is kept so traces can span hops
//! - The id is attached as early as possible so the access log sees it

use axum::http::HeaderMap;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that assigns missing request ids.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Request id from `headers`, if present and printable.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}
