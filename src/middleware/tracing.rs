// ABOUTME: Request tracing helpers for correlation and structured logging
// ABOUTME: Request ID propagation and the per-request span used by the HTTP trace layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::http::{HeaderMap, Request};
use tracing::{field, info_span, Span};
use uuid::Uuid;

/// Header carrying the caller's request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuse the caller's `x-request-id` or generate a fresh one
#[must_use]
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map_or_else(
            || format!("req_{}", Uuid::new_v4().simple()),
            ToOwned::to_owned,
        )
}

/// Create a tracing span for an HTTP request
pub fn create_request_span<B>(request: &Request<B>) -> Span {
    info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request.headers()),
        status = field::Empty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_id_header_is_reused() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");
    }

    #[test]
    fn test_request_id_generated() {
        let generated = request_id(&HeaderMap::new());
        assert!(generated.starts_with("req_"));
        assert_eq!(generated.len(), 36);
    }
}
