// ABOUTME: HTTP middleware for request tracing and cross-origin access
// ABOUTME: Request ID propagation, request spans, and CORS layer construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS configuration
pub mod cors;
/// Request tracing and request IDs
pub mod tracing;

pub use cors::setup_cors;
pub use self::tracing::{create_request_span, request_id, REQUEST_ID_HEADER};
